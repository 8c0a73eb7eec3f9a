//! Admission queue for transactions awaiting block inclusion.
//!
//! Admission is serialized behind a single write lock: the duplicate check,
//! nonce check, and any reordering are not individually atomic and must be
//! observed as one transition.

use crate::config::{Config, QueueMode};
use crate::core::transaction::Transaction;
use crate::script::ScriptError;
use crate::types::account_id::AccountId;
use crate::types::hash::Hash;
use crate::types::state::Balances;
use crate::warn;
use quorumchain_derive::Error;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Rejection reasons on the admission path.
///
/// These are routine outcomes, not faults; every caller is expected to check
/// them and the pool never panics over a bad transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmitError {
    /// Stored signature does not verify against the sender.
    #[error("signature verification failed")]
    InvalidSignature,

    /// Premium under the configured floor.
    #[error("premium {premium} below configured minimum {min}")]
    PremiumTooLow { premium: u64, min: u64 },

    /// Nonce does not advance past the sender's last admitted nonce.
    #[error("nonce {nonce} does not advance past last admitted nonce {last}")]
    StaleNonce { nonce: u64, last: u64 },

    /// Sender balance cannot cover the premium.
    #[error("balance {balance} cannot cover premium {premium}")]
    InsufficientBalance { balance: u64, premium: u64 },

    /// Identity hash already present in the pool.
    #[error("transaction already admitted")]
    Duplicate,

    /// Script failed the syntax gate.
    #[error("script rejected: {0}")]
    InvalidScript(ScriptError),
}

struct Inner {
    /// Next sequence number to assign.
    seq: u64,
    /// Queued transactions with their admission sequence numbers.
    entries: Vec<(u64, Transaction)>,
    /// Identity hashes of queued transactions, for O(1) duplicate detection.
    hashes: HashSet<Hash>,
    /// Last admitted nonce per sender. Survives `select`, so replayed nonces
    /// stay rejected after their transaction leaves the pool.
    nonces: HashMap<AccountId, u64>,
}

/// Pool of pending transactions.
pub struct Mempool {
    mode: QueueMode,
    inner: RwLock<Inner>,
}

impl Mempool {
    /// Creates an empty pool with the given ordering mode.
    pub fn new(mode: QueueMode) -> Self {
        Self {
            mode,
            inner: RwLock::new(Inner {
                seq: 0,
                entries: Vec::new(),
                hashes: HashSet::new(),
                nonces: HashMap::new(),
            }),
        }
    }

    /// Validates and enqueues a transaction.
    ///
    /// On success the identity hash is recorded, the sender's nonce watermark
    /// advances, and the queue is re-sorted by `(premium desc, sequence asc)`
    /// when the mode is [`QueueMode::Priority`].
    pub fn admit(
        &self,
        tx: Transaction,
        balances: &Balances,
        config: &Config,
    ) -> Result<(), AdmitError> {
        let mut inner = self.inner.write().unwrap();

        let last_nonce = inner.nonces.get(&tx.sender).copied().unwrap_or(0);
        if let Err(reason) = tx.validate(balances, last_nonce, config) {
            warn!("rejecting transaction from {}: {}", tx.sender, reason);
            return Err(reason);
        }

        let hash = tx.identity();
        if !inner.hashes.insert(hash) {
            warn!("rejecting duplicate transaction {}", hash);
            return Err(AdmitError::Duplicate);
        }

        inner.nonces.insert(tx.sender.clone(), tx.nonce);
        let seq = inner.seq;
        inner.seq += 1;
        inner.entries.push((seq, tx));

        if self.mode == QueueMode::Priority {
            inner
                .entries
                .sort_by(|a, b| b.1.premium.cmp(&a.1.premium).then(a.0.cmp(&b.0)));
        }
        Ok(())
    }

    /// Removes and returns up to `cap` transactions from the front of the
    /// current order, dropping their hashes from the duplicate set.
    ///
    /// The removal is permanent: transactions selected into a block that later
    /// fails to finalize are not returned to the pool. Nonce watermarks are
    /// kept, so the same transaction cannot be re-admitted afterwards.
    pub fn select(&self, cap: usize) -> Vec<Transaction> {
        let mut inner = self.inner.write().unwrap();

        let take = cap.min(inner.entries.len());
        let selected: Vec<(u64, Transaction)> = inner.entries.drain(..take).collect();
        for (_, tx) in &selected {
            inner.hashes.remove(&tx.identity());
        }
        selected.into_iter().map(|(_, tx)| tx).collect()
    }

    /// Number of queued transactions.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a transaction with this identity hash is queued.
    pub fn contains(&self, hash: Hash) -> bool {
        self.inner.read().unwrap().hashes.contains(&hash)
    }
}
