//! Filesystem persistence.
//!
//! - [`block_store`]: one JSON document per block, split across a pending and
//!   a finalized location, named by identity hash
//! - [`snapshot`]: the companion `state.json` / `balances.json` /
//!   `validators.json` documents

pub mod block_store;
pub mod snapshot;

pub use block_store::{BlockStore, StoreError};
