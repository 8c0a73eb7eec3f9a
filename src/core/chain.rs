//! Ordered block sequence tracking the finalized working state.
//!
//! Appending is cheap and accepts pending blocks; what the chain *exposes* as
//! working state and balances comes from the latest finalized block only. A
//! pending tip never feeds the next candidate.

use crate::core::block::Block;
use crate::info;
use crate::types::hash::Hash;
use crate::types::state::{Balances, State};
use dashmap::DashMap;
use quorumchain_derive::Error;
use std::sync::{Arc, RwLock};

/// Errors appending a block to the chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Block height does not extend the sequence.
    #[error("block height {actual} does not extend chain height {tip}")]
    HeightMismatch { actual: u64, tip: u64 },

    /// Previous-hash link does not match the current tip.
    #[error("previous hash {actual} does not match tip {expected}")]
    PrevHashMismatch { expected: Hash, actual: Hash },

    /// A block with this identity hash was already appended.
    #[error("block {0} already appended")]
    DuplicateBlock(Hash),
}

/// The single chain of blocks by height.
pub struct Chain {
    /// Blocks indexed by identity hash.
    blocks: DashMap<Hash, Arc<Block>>,
    /// Identity hashes in height order.
    order: RwLock<Vec<Hash>>,
}

impl Chain {
    /// Creates a chain seeded with the finalized genesis block built from the
    /// initial snapshots.
    pub fn with_genesis(state: State, balances: Balances) -> Self {
        let genesis = Arc::new(Block::genesis(state, balances));
        let hash = genesis.identity();
        let chain = Self {
            blocks: DashMap::new(),
            order: RwLock::new(Vec::new()),
        };
        chain.blocks.insert(hash, genesis);
        chain.order.write().unwrap().push(hash);
        info!("initialized chain with genesis block {}", hash);
        chain
    }

    /// Appends a block, pending or finalized.
    ///
    /// The block must extend the tip: height equals the current length and
    /// `prev_hash` equals the tip's identity (the zero sentinel under an empty
    /// sequence never occurs here since every chain starts at genesis).
    pub fn append(&self, block: Arc<Block>) -> Result<(), ChainError> {
        let mut order = self.order.write().unwrap();

        let expected_height = order.len() as u64;
        if block.header.height != expected_height {
            return Err(ChainError::HeightMismatch {
                actual: block.header.height,
                tip: expected_height.saturating_sub(1),
            });
        }

        let expected_prev = order.last().copied().unwrap_or_else(Hash::zero);
        if block.header.prev_hash != expected_prev {
            return Err(ChainError::PrevHashMismatch {
                expected: expected_prev,
                actual: block.header.prev_hash,
            });
        }

        let hash = block.identity();
        if self.blocks.contains_key(&hash) {
            return Err(ChainError::DuplicateBlock(hash));
        }

        self.blocks.insert(hash, block);
        order.push(hash);
        info!("appended block {} at height {}", hash, expected_height);
        Ok(())
    }

    /// Height of the tip block (genesis = 0).
    pub fn height(&self) -> u64 {
        (self.order.read().unwrap().len() as u64).saturating_sub(1)
    }

    /// The tip block, finalized or not.
    pub fn tip(&self) -> Arc<Block> {
        let order = self.order.read().unwrap();
        let hash = order.last().expect("chain always holds at least genesis");
        self.blocks
            .get(hash)
            .expect("ordered hash always resolves to a block")
            .clone()
    }

    /// Returns `true` if a block with this identity hash was appended.
    pub fn has_block(&self, hash: Hash) -> bool {
        self.blocks.contains_key(&hash)
    }

    /// Looks up a block by identity hash.
    pub fn get(&self, hash: Hash) -> Option<Arc<Block>> {
        self.blocks.get(&hash).map(|entry| entry.clone())
    }

    /// The highest finalized block.
    ///
    /// Walks back from the tip; genesis is always finalized, so this always
    /// resolves.
    pub fn latest_final(&self) -> Arc<Block> {
        let order = self.order.read().unwrap();
        for hash in order.iter().rev() {
            if let Some(block) = self.blocks.get(hash) {
                if block.is_finalized() {
                    return block.clone();
                }
            }
        }
        unreachable!("chain always contains a finalized genesis block")
    }

    /// Working state for the next candidate: the latest finalized snapshot.
    pub fn working_state(&self) -> State {
        self.latest_final().state().clone()
    }

    /// Working balances for admission and the next candidate: the latest
    /// finalized snapshot.
    pub fn working_balances(&self) -> Balances {
        self.latest_final().balances()
    }
}
