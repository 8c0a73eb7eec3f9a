//! Cryptographic signing capability.

pub mod key_pair;

pub use key_pair::{verify, PrivateKey, PublicKey};
