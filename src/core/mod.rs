//! Core consensus and state-transition engine.
//!
//! - `Transaction`: signed script-carrying intent with a canonical identity
//! - `Mempool`: admission queue with dedup, replay protection, and ordering
//! - `Block`: candidate construction, proof-of-work sealing, quorum finality
//! - `ValidatorSet`: membership and quorum arithmetic
//! - `Chain`: ordered blocks tracking the finalized working state

pub mod block;
pub mod chain;
pub mod mempool;
pub mod transaction;
pub mod validator_set;
