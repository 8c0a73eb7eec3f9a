//! Shared helpers for unit tests.

use crate::config::Config;
use crate::core::block::Block;
use crate::core::transaction::Transaction;
use crate::core::validator_set::{ValidatorInfo, ValidatorSet};
use crate::crypto::PrivateKey;
use crate::types::account_id::AccountId;
use crate::types::state::{Balances, State};

/// A signed transaction from `key`.
pub fn signed_tx(key: &PrivateKey, script: &str, premium: u64, nonce: u64) -> Transaction {
    let mut tx = Transaction::new(key.account_id(), script, premium, nonce);
    tx.sign(key);
    tx
}

/// A state holding only `counter` at the given value.
pub fn counter_state(counter: i64) -> State {
    [("counter".to_string(), counter)].into_iter().collect()
}

/// Balances funded from the given entries.
pub fn funded_balances(entries: &[(AccountId, u64)]) -> Balances {
    entries.iter().cloned().collect()
}

/// `n` fresh validator keys plus the set built from their public keys.
pub fn validator_set_from(n: usize, quorum_percent: u8) -> (ValidatorSet, Vec<PrivateKey>) {
    let keys: Vec<PrivateKey> = (0..n).map(|_| PrivateKey::new()).collect();
    let validators = keys
        .iter()
        .enumerate()
        .map(|(i, key)| ValidatorInfo {
            pubkey: key.account_id(),
            name: format!("Val-{i}"),
        })
        .collect();
    let set = ValidatorSet::new(validators, quorum_percent).expect("valid quorum percent");
    (set, keys)
}

/// Signs a sealed block's identity hash with `key`, returning the submission
/// pair for `add_signature`.
pub fn sign_block(block: &Block, key: &PrivateKey) -> (AccountId, String) {
    let message = block.signing_message().expect("block must be sealed");
    (key.account_id(), key.sign(&message))
}

/// Default configuration with a test-friendly difficulty.
pub fn test_config() -> Config {
    Config {
        difficulty_bits: 8,
        ..Config::default()
    }
}
