//! Signed script-carrying transactions.

use crate::config::Config;
use crate::core::mempool::AdmitError;
use crate::crypto::{self, PrivateKey};
use crate::script;
use crate::types::account_id::AccountId;
use crate::types::canonical::Canonical;
use crate::types::hash::Hash;
use crate::types::state::Balances;
use quorumchain_derive::Canonical;
use serde::{Deserialize, Serialize};

/// A transaction: the sender's intent to run a script against the shared
/// state, paying a premium for inclusion.
///
/// Identity covers `{sender, script, premium, nonce}` only. The signature slot
/// is outside the identity, so re-signing never changes the hash. Immutable
/// once admitted; ownership moves from mempool to block.
#[derive(Clone, Debug, PartialEq, Eq, Canonical, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender account; doubles as the verification key.
    #[serde(rename = "from")]
    pub sender: AccountId,
    /// Script payload executed at block construction.
    pub script: String,
    /// Fee offered for inclusion, shared among signing validators.
    pub premium: u64,
    /// Per-sender replay counter; admitted nonces strictly increase.
    pub nonce: u64,
    /// Hex signature over the canonical identity fields. Empty until signed.
    #[canonical(skip)]
    #[serde(default)]
    pub signature: String,
}

impl Transaction {
    /// Creates an unsigned transaction.
    pub fn new(
        sender: AccountId,
        script: impl Into<String>,
        premium: u64,
        nonce: u64,
    ) -> Self {
        Self {
            sender,
            script: script.into(),
            premium,
            nonce,
            signature: String::new(),
        }
    }

    /// Canonical identity hash over the four identity fields.
    ///
    /// Pure and signature-independent: the hash is the same before and after
    /// [`sign`](Self::sign).
    pub fn identity(&self) -> Hash {
        let mut h = Hash::sha3();
        h.update(b"TX");
        self.encode(&mut h);
        h.finalize()
    }

    /// Signs the canonical identity fields, storing the signature separately.
    pub fn sign(&mut self, key: &PrivateKey) {
        self.signature = key.sign(&self.canonical_bytes());
    }

    /// Verifies the stored signature against the sender key.
    ///
    /// Total: unsigned, malformed, and invalid signatures are all `false`.
    pub fn verify(&self) -> bool {
        if self.signature.is_empty() {
            return false;
        }
        crypto::verify(&self.sender, &self.canonical_bytes(), &self.signature)
    }

    /// Whether the premium meets the configured minimum.
    pub fn is_premium_valid(&self, config: &Config) -> bool {
        self.premium >= config.min_premium
    }

    /// Whether the nonce advances past the sender's last admitted nonce.
    pub fn is_nonce_valid(&self, last_nonce: u64) -> bool {
        self.nonce > last_nonce
    }

    /// Whether the sender's balance covers the premium.
    pub fn has_sufficient_balance(&self, balances: &Balances) -> bool {
        balances.balance_of(&self.sender) >= self.premium
    }

    /// Composite admission gate.
    ///
    /// Signature, premium floor, nonce monotonicity, balance cover, and a
    /// syntax-only script check. The script is not executed here; the state it
    /// will run against is only known at block construction.
    pub fn validate(
        &self,
        balances: &Balances,
        last_nonce: u64,
        config: &Config,
    ) -> Result<(), AdmitError> {
        if !self.verify() {
            return Err(AdmitError::InvalidSignature);
        }
        if !self.is_premium_valid(config) {
            return Err(AdmitError::PremiumTooLow {
                premium: self.premium,
                min: config.min_premium,
            });
        }
        if !self.is_nonce_valid(last_nonce) {
            return Err(AdmitError::StaleNonce {
                nonce: self.nonce,
                last: last_nonce,
            });
        }
        if !self.has_sufficient_balance(balances) {
            return Err(AdmitError::InsufficientBalance {
                balance: balances.balance_of(&self.sender),
                premium: self.premium,
            });
        }
        script::parse(&self.script, &config.script_limits).map_err(AdmitError::InvalidScript)?;
        Ok(())
    }
}
