//! A minimal single-chain ledger.
//!
//! Transactions carry a tiny scripting payload that mutates shared integer
//! state. Blocks batch transactions, are sealed by proof-of-work, and become
//! final once a quorum of designated validators signs their identity hash;
//! finalization distributes the block reward and splits the collected premiums
//! among signers.
//!
//! Pipeline: `Mempool::admit` -> `Mempool::select` ->
//! `Block::create_candidate` -> `Block::seal` -> `Block::add_signature` ->
//! `Block::finalize` -> `Chain::append`.

pub mod config;
pub mod core;
pub mod crypto;
pub mod script;
pub mod storage;
pub mod types;
pub mod utils;
