//! Core type definitions for the ledger.
//!
//! - `Hash`: fixed-size SHA3-256 content hashes
//! - `Canonical`: deterministic byte encoding used as hash input
//! - `AccountId`: public-key account identifiers
//! - `State` / `Balances`: the two snapshot mappings blocks carry

pub mod account_id;
pub mod canonical;
pub mod hash;
pub mod state;
