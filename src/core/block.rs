//! Block construction, proof-of-work sealing, and quorum finalization.
//!
//! A block moves through `candidate -> sealed -> (signed)* -> finalized`.
//! Everything short of finalized is "pending": a block that never reaches
//! quorum simply stays pending, it is not an error.
//!
//! Lock order inside a block is `consensus` before `balances`; identity
//! computation takes only the balances read lock and is never called while
//! `consensus` is held without the sealed hash in place.

use crate::config::{Config, RemainderTarget, ScriptLimits};
use crate::core::transaction::Transaction;
use crate::core::validator_set::ValidatorSet;
use crate::crypto;
use crate::info;
use crate::script;
use crate::script::ScriptError;
use crate::types::account_id::AccountId;
use crate::types::canonical::Canonical;
use crate::types::hash::Hash;
use crate::types::state::{Balances, State};
use quorumchain_derive::{Canonical, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Iterations between cancellation checks during the proof-of-work search.
const SEAL_CANCEL_INTERVAL: u64 = 1024;

/// Account label carried by the genesis block's miner field.
pub const GENESIS_MINER: &str = "genesis";

/// Block header.
#[derive(Clone, Debug, PartialEq, Eq, Canonical, Serialize, Deserialize)]
pub struct Header {
    /// Identity hash of the preceding block; zero sentinel at height 0.
    pub prev_hash: Hash,
    /// Position in the chain (genesis = 0).
    pub height: u64,
    /// Proof-of-work counter.
    pub nonce: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Account credited with the block reward.
    pub miner: AccountId,
}

/// Cooperative cancellation flag for the proof-of-work search.
///
/// Clones share the flag, so a supervising task can hold one half and cancel a
/// seal running elsewhere when the candidate goes stale or the node shuts down.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Errors from the block state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Proof-of-work search observed a cancellation request.
    #[error("proof-of-work search cancelled")]
    SealCancelled,

    /// Operation requires a sealed block.
    #[error("block is not sealed")]
    NotSealed,

    /// Signer is not a member of the validator set.
    #[error("{0} is not a designated validator")]
    UnknownValidator(AccountId),

    /// Signature does not verify against the block's identity hash.
    #[error("signature from {0} does not verify against the block hash")]
    InvalidSignature(AccountId),

    /// Recorded signatures fall short of the quorum. Recoverable: the block
    /// stays pending and collection may continue.
    #[error("quorum not reached: {have} of {need} signatures")]
    QuorumNotReached { have: usize, need: usize },

    /// Finalize was already applied; a second application would double-pay.
    #[error("block is already finalized")]
    AlreadyFinalized,

    /// Reward or premium credit exceeded the balance range.
    #[error("balance overflow crediting {0}")]
    CreditOverflow(AccountId),

    /// Premium total exceeded the representable range.
    #[error("premium total overflow")]
    PremiumOverflow,
}

#[derive(Default)]
struct ConsensusMeta {
    /// Verified validator signatures over the sealed identity hash.
    signatures: BTreeMap<AccountId, String>,
    /// Sorted signer list, frozen at finalization.
    signers_frozen: Vec<AccountId>,
    finalized: bool,
}

/// A block: header, ordered transactions, and the post-execution state and
/// balance snapshots.
///
/// The identity hash covers header, transactions, state, and balances;
/// validator signatures and the finalized flag stay outside it. Sealing
/// freezes the identity, so consensus signing targets a fixed hash and the
/// balance rewrite at finalization cannot move it.
pub struct Block {
    /// Header; the proof-of-work nonce mutates only during [`seal`](Self::seal).
    pub header: Header,
    /// Transactions in execution order.
    pub transactions: Vec<Transaction>,
    state: State,
    balances: RwLock<Balances>,
    sealed_hash: OnceLock<Hash>,
    consensus: RwLock<ConsensusMeta>,
}

impl Block {
    /// Builds a candidate block from the parent snapshots.
    ///
    /// This is the state transition function: each transaction's script runs
    /// in order against a copy of the parent state, folding the result
    /// forward. Nonce and balance checks already happened at admission and are
    /// not repeated here. Deterministic given the same inputs.
    pub fn create_candidate(
        prev_hash: Hash,
        height: u64,
        miner: AccountId,
        transactions: Vec<Transaction>,
        parent_state: &State,
        parent_balances: &Balances,
        limits: &ScriptLimits,
    ) -> Result<Self, ScriptError> {
        let mut state = parent_state.clone();
        for tx in &transactions {
            state = script::execute(&tx.script, &state, limits)?;
        }

        let header = Header {
            prev_hash,
            height,
            nonce: 0,
            timestamp: unix_now(),
            miner,
        };

        Ok(Self {
            header,
            transactions,
            state,
            balances: RwLock::new(parent_balances.clone()),
            sealed_hash: OnceLock::new(),
            consensus: RwLock::new(ConsensusMeta::default()),
        })
    }

    /// Builds the finalized genesis block from the initial snapshots.
    ///
    /// The genesis identity is forced to the zero sentinel so the first real
    /// block links to `Hash::zero()`.
    pub fn genesis(state: State, balances: Balances) -> Self {
        let block = Self {
            header: Header {
                prev_hash: Hash::zero(),
                height: 0,
                nonce: 0,
                timestamp: 0,
                miner: AccountId::new(GENESIS_MINER),
            },
            transactions: Vec::new(),
            state,
            balances: RwLock::new(balances),
            sealed_hash: OnceLock::new(),
            consensus: RwLock::new(ConsensusMeta {
                signatures: BTreeMap::new(),
                signers_frozen: Vec::new(),
                finalized: true,
            }),
        };
        let _ = block.sealed_hash.set(Hash::zero());
        block
    }

    fn compute_identity(&self) -> Hash {
        let mut h = Hash::sha3();
        h.update(b"BLOCK");
        self.header.encode(&mut h);
        (self.transactions.len() as u64).encode(&mut h);
        for tx in &self.transactions {
            // the signature is outside the transaction's own identity but part
            // of the block commitment
            tx.encode(&mut h);
            tx.signature.encode(&mut h);
        }
        self.state.encode(&mut h);
        self.balances.read().unwrap().encode(&mut h);
        h.finalize()
    }

    /// The block's identity hash.
    ///
    /// Frozen once sealed; before that it is recomputed live and moves with
    /// the proof-of-work nonce.
    pub fn identity(&self) -> Hash {
        match self.sealed_hash.get() {
            Some(hash) => *hash,
            None => self.compute_identity(),
        }
    }

    /// Returns `true` once the proof-of-work seal is in place.
    pub fn is_sealed(&self) -> bool {
        self.sealed_hash.get().is_some()
    }

    /// Proof-of-work search: finds a header nonce whose identity hash falls
    /// strictly below `2^(256 - difficulty_bits)`.
    ///
    /// Checks `cancel` every [`SEAL_CANCEL_INTERVAL`] iterations so callers
    /// can abandon stale candidates or shut down. On success the identity is
    /// frozen and returned; re-sealing a sealed block returns the frozen hash.
    pub fn seal(&mut self, difficulty_bits: u32, cancel: &CancelToken) -> Result<Hash, BlockError> {
        if let Some(hash) = self.sealed_hash.get() {
            return Ok(*hash);
        }

        let mut nonce = 0u64;
        loop {
            if nonce % SEAL_CANCEL_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(BlockError::SealCancelled);
            }
            self.header.nonce = nonce;
            let hash = self.compute_identity();
            if hash.meets_difficulty(difficulty_bits) {
                let _ = self.sealed_hash.set(hash);
                info!(
                    "sealed block height={} hash={} after {} iterations",
                    self.header.height,
                    hash,
                    nonce + 1
                );
                return Ok(hash);
            }
            nonce += 1;
        }
    }

    /// The message a validator signs for this block: the ASCII hex rendering
    /// of the sealed identity hash.
    pub fn signing_message(&self) -> Result<Vec<u8>, BlockError> {
        let hash = self.sealed_hash.get().ok_or(BlockError::NotSealed)?;
        Ok(hash.to_string().into_bytes())
    }

    /// Records a validator signature over the sealed identity hash.
    ///
    /// Rejects non-members and signatures that do not verify. Idempotent per
    /// pubkey: a repeated valid submission overwrites the stored entry. Safe
    /// under concurrent callers.
    pub fn add_signature(
        &self,
        pubkey: AccountId,
        signature: String,
        validators: &ValidatorSet,
    ) -> Result<(), BlockError> {
        if !validators.contains(&pubkey) {
            return Err(BlockError::UnknownValidator(pubkey));
        }
        let message = self.signing_message()?;
        if !crypto::verify(&pubkey, &message, &signature) {
            return Err(BlockError::InvalidSignature(pubkey));
        }
        self.consensus
            .write()
            .unwrap()
            .signatures
            .insert(pubkey, signature);
        Ok(())
    }

    /// One-shot finalization: checks quorum, distributes reward and premiums,
    /// freezes the signer list.
    ///
    /// Holds the consensus write guard for the whole transition, so finalize
    /// runs at most once even when two signature arrivals race into it.
    /// Distribution starts from `parent_balances`, never from the block's own
    /// snapshot, which is exactly why a second application must be rejected.
    pub fn finalize(
        &self,
        validators: &ValidatorSet,
        parent_balances: &Balances,
        config: &Config,
    ) -> Result<(), BlockError> {
        if self.sealed_hash.get().is_none() {
            return Err(BlockError::NotSealed);
        }

        let mut meta = self.consensus.write().unwrap();
        if meta.finalized {
            return Err(BlockError::AlreadyFinalized);
        }

        // BTreeMap keys iterate sorted, so the frozen list is already ordered.
        let signers: Vec<AccountId> = meta
            .signatures
            .keys()
            .filter(|pubkey| validators.contains(pubkey))
            .cloned()
            .collect();

        let need = validators.quorum();
        if signers.len() < need {
            return Err(BlockError::QuorumNotReached {
                have: signers.len(),
                need,
            });
        }

        let premiums_total = self
            .transactions
            .iter()
            .try_fold(0u64, |acc, tx| acc.checked_add(tx.premium))
            .ok_or(BlockError::PremiumOverflow)?;

        let mut balances = parent_balances.clone();
        balances
            .credit(&self.header.miner, config.block_reward)
            .map_err(|_| BlockError::CreditOverflow(self.header.miner.clone()))?;

        if signers.is_empty() {
            // empty validator set: trivial quorum, premiums route to the miner
            // so no value vanishes
            balances
                .credit(&self.header.miner, premiums_total)
                .map_err(|_| BlockError::CreditOverflow(self.header.miner.clone()))?;
        } else {
            let share = premiums_total / signers.len() as u64;
            let remainder = premiums_total % signers.len() as u64;
            for signer in &signers {
                balances
                    .credit(signer, share)
                    .map_err(|_| BlockError::CreditOverflow(signer.clone()))?;
            }
            if remainder > 0 {
                let target = match config.remainder_target {
                    RemainderTarget::Miner => &self.header.miner,
                    RemainderTarget::FirstSigner => &signers[0],
                };
                balances
                    .credit(target, remainder)
                    .map_err(|_| BlockError::CreditOverflow(target.clone()))?;
            }
        }

        *self.balances.write().unwrap() = balances;
        meta.signers_frozen = signers;
        meta.finalized = true;
        info!(
            "finalized block height={} hash={} signers={} premiums={}",
            self.header.height,
            self.identity(),
            meta.signers_frozen.len(),
            premiums_total
        );
        Ok(())
    }

    /// The post-execution state snapshot.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The block's balance snapshot: the parent's until finalization, the
    /// distributed result after.
    pub fn balances(&self) -> Balances {
        self.balances.read().unwrap().clone()
    }

    /// Returns `true` once the block is finalized.
    pub fn is_finalized(&self) -> bool {
        self.consensus.read().unwrap().finalized
    }

    /// Number of recorded validator signatures.
    pub fn signature_count(&self) -> usize {
        self.consensus.read().unwrap().signatures.len()
    }

    /// The sorted signer list frozen at finalization; empty while pending.
    pub fn signers_frozen(&self) -> Vec<AccountId> {
        self.consensus.read().unwrap().signers_frozen.clone()
    }

    /// The recorded validator signatures.
    pub fn validator_signatures(&self) -> BTreeMap<AccountId, String> {
        self.consensus.read().unwrap().signatures.clone()
    }

    /// Converts to the persisted document form.
    pub fn to_record(&self) -> BlockRecord {
        let meta = self.consensus.read().unwrap();
        BlockRecord {
            header: self.header.clone(),
            transactions: self.transactions.clone(),
            state: self.state.clone(),
            balances: self.balances.read().unwrap().clone(),
            hash: self.identity(),
            validator_signatures: meta.signatures.clone(),
            finalized: meta.finalized,
            signers_frozen: meta.signers_frozen.clone(),
        }
    }

    /// Rebuilds a block from its persisted document.
    ///
    /// The stored hash is trusted and installed as the sealed identity.
    pub fn from_record(record: BlockRecord) -> Self {
        let block = Self {
            header: record.header,
            transactions: record.transactions,
            state: record.state,
            balances: RwLock::new(record.balances),
            sealed_hash: OnceLock::new(),
            consensus: RwLock::new(ConsensusMeta {
                signatures: record.validator_signatures,
                signers_frozen: record.signers_frozen,
                finalized: record.finalized,
            }),
        };
        let _ = block.sealed_hash.set(record.hash);
        block
    }
}

/// Persisted block document, one JSON file per block named by identity hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub header: Header,
    pub transactions: Vec<Transaction>,
    pub state: State,
    pub balances: Balances,
    pub hash: Hash,
    pub validator_signatures: BTreeMap<AccountId, String>,
    pub finalized: bool,
    pub signers_frozen: Vec<AccountId>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::utils::test_utils::{
        counter_state, funded_balances, sign_block, signed_tx, test_config, validator_set_from,
    };

    const TEST_DIFFICULTY: u32 = 8;

    fn candidate(transactions: Vec<Transaction>, balances: &Balances) -> Block {
        Block::create_candidate(
            Hash::zero(),
            1,
            AccountId::new("miner"),
            transactions,
            &counter_state(0),
            balances,
            &ScriptLimits::default(),
        )
        .unwrap()
    }

    fn sealed(transactions: Vec<Transaction>, balances: &Balances) -> Block {
        let mut block = candidate(transactions, balances);
        block.seal(TEST_DIFFICULTY, &CancelToken::new()).unwrap();
        block
    }

    #[test]
    fn candidate_executes_scripts_in_order() {
        let key = PrivateKey::new();
        let balances = funded_balances(&[(key.account_id(), 100)]);
        let txs = vec![
            signed_tx(&key, "let counter = counter + 1", 1, 1),
            signed_tx(&key, "let counter = counter + 1; let copy = counter", 1, 2),
        ];

        let block = candidate(txs, &balances);
        assert_eq!(block.state().get("counter"), Some(2));
        assert_eq!(block.state().get("copy"), Some(2));
        // balances snapshot is the parent's copy at candidate time
        assert_eq!(block.balances(), balances);
    }

    #[test]
    fn candidate_leaves_parent_snapshots_untouched() {
        let key = PrivateKey::new();
        let parent_state = counter_state(0);
        let balances = funded_balances(&[(key.account_id(), 100)]);

        let _ = Block::create_candidate(
            Hash::zero(),
            1,
            AccountId::new("miner"),
            vec![signed_tx(&key, "let counter = counter + 7", 1, 1)],
            &parent_state,
            &balances,
            &ScriptLimits::default(),
        )
        .unwrap();

        assert_eq!(parent_state.get("counter"), Some(0));
    }

    #[test]
    fn candidate_propagates_evaluation_errors() {
        let key = PrivateKey::new();
        let balances = funded_balances(&[(key.account_id(), 100)]);
        let result = Block::create_candidate(
            Hash::zero(),
            1,
            AccountId::new("miner"),
            vec![signed_tx(&key, "let x = ghost + 1", 1, 1)],
            &State::new(),
            &balances,
            &ScriptLimits::default(),
        );
        assert!(matches!(result, Err(ScriptError::UnknownVariable(_))));
    }

    #[test]
    fn seal_satisfies_the_difficulty_bound() {
        let block = sealed(vec![], &Balances::new());
        // hash as a 256-bit integer is strictly below 2^(256 - bits)
        assert!(block.identity().leading_zero_bits() >= TEST_DIFFICULTY);
        assert!(block.is_sealed());
    }

    #[test]
    fn seal_is_interruptible() {
        let mut block = candidate(vec![], &Balances::new());
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            block.seal(64, &cancel),
            Err(BlockError::SealCancelled)
        );
        assert!(!block.is_sealed());
    }

    #[test]
    fn resealing_returns_the_frozen_hash() {
        let mut block = sealed(vec![], &Balances::new());
        let first = block.identity();
        assert_eq!(block.seal(TEST_DIFFICULTY, &CancelToken::new()), Ok(first));
    }

    #[test]
    fn signatures_require_a_sealed_block() {
        let block = candidate(vec![], &Balances::new());
        let (validators, keys) = validator_set_from(3, 51);
        let pubkey = keys[0].account_id();
        let result = block.add_signature(pubkey, "00".to_string(), &validators);
        assert_eq!(result, Err(BlockError::NotSealed));
    }

    #[test]
    fn add_signature_rejects_non_members() {
        let block = sealed(vec![], &Balances::new());
        let (validators, _) = validator_set_from(3, 51);
        let outsider = PrivateKey::new();
        let (pubkey, signature) = sign_block(&block, &outsider);
        assert_eq!(
            block.add_signature(pubkey.clone(), signature, &validators),
            Err(BlockError::UnknownValidator(pubkey))
        );
        assert_eq!(block.signature_count(), 0);
    }

    #[test]
    fn add_signature_rejects_invalid_signatures() {
        let block = sealed(vec![], &Balances::new());
        let (validators, keys) = validator_set_from(3, 51);
        let pubkey = keys[0].account_id();
        assert_eq!(
            block.add_signature(pubkey.clone(), "deadbeef".to_string(), &validators),
            Err(BlockError::InvalidSignature(pubkey))
        );
    }

    #[test]
    fn add_signature_is_idempotent_per_validator() {
        let block = sealed(vec![], &Balances::new());
        let (validators, keys) = validator_set_from(3, 51);

        let (pubkey, signature) = sign_block(&block, &keys[0]);
        block
            .add_signature(pubkey.clone(), signature.clone(), &validators)
            .unwrap();
        block.add_signature(pubkey, signature, &validators).unwrap();
        assert_eq!(block.signature_count(), 1);
    }

    #[test]
    fn finalize_below_quorum_is_recoverable() {
        let (validators, keys) = validator_set_from(3, 51);
        let parent_balances = Balances::new();
        let block = sealed(vec![], &parent_balances);

        let (pubkey, signature) = sign_block(&block, &keys[0]);
        block.add_signature(pubkey, signature, &validators).unwrap();

        assert_eq!(
            block.finalize(&validators, &parent_balances, &test_config()),
            Err(BlockError::QuorumNotReached { have: 1, need: 2 })
        );
        assert!(!block.is_finalized());
        assert!(block.signers_frozen().is_empty());
        // balances unchanged while pending
        assert_eq!(block.balances(), parent_balances);

        // a second signature arrives later; finalization now succeeds
        let (pubkey, signature) = sign_block(&block, &keys[1]);
        block.add_signature(pubkey, signature, &validators).unwrap();
        assert!(block
            .finalize(&validators, &parent_balances, &test_config())
            .is_ok());
        assert!(block.is_finalized());
    }

    #[test]
    fn finalize_is_exactly_once() {
        let (validators, keys) = validator_set_from(3, 51);
        let parent_balances = Balances::new();
        let block = sealed(vec![], &parent_balances);

        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }

        block
            .finalize(&validators, &parent_balances, &test_config())
            .unwrap();
        assert_eq!(
            block.finalize(&validators, &parent_balances, &test_config()),
            Err(BlockError::AlreadyFinalized)
        );
    }

    #[test]
    fn finalize_requires_a_sealed_block() {
        let (validators, _) = validator_set_from(3, 51);
        let block = candidate(vec![], &Balances::new());
        assert_eq!(
            block.finalize(&validators, &Balances::new(), &test_config()),
            Err(BlockError::NotSealed)
        );
    }

    #[test]
    fn finalize_conserves_value() {
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);
        let config = test_config();

        let txs = vec![
            signed_tx(&sender, "let counter = counter + 1", 7, 1),
            signed_tx(&sender, "let counter = counter + 1", 4, 2),
        ];
        let block = sealed(txs, &parent_balances);
        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        block.finalize(&validators, &parent_balances, &config).unwrap();

        let created = block.balances().total() - parent_balances.total();
        assert_eq!(created, (config.block_reward + 7 + 4) as u128);
    }

    #[test]
    fn finalize_distributes_reward_and_premium_shares() {
        // genesis state {counter: 0}, balances {U: 1000}; one transaction with
        // premium 1; reward 5; 3 validators at 51% all sign. share = 1/3 = 0,
        // remainder 1 routes to the miner: miner ends up with 5 + 1.
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);
        let config = test_config();
        let miner = AccountId::new("miner");

        let block = sealed(
            vec![signed_tx(&sender, "let counter = counter + 1", 1, 1)],
            &parent_balances,
        );
        assert_eq!(block.state().get("counter"), Some(1));

        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        block.finalize(&validators, &parent_balances, &config).unwrap();

        let balances = block.balances();
        assert_eq!(balances.balance_of(&miner), 6);
        for key in &keys {
            assert_eq!(balances.balance_of(&key.account_id()), 0);
        }
        assert_eq!(balances.balance_of(&sender.account_id()), 1000);
        assert_eq!(block.signers_frozen().len(), 3);
    }

    #[test]
    fn finalize_splits_evenly_when_divisible() {
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);
        let config = test_config();

        let block = sealed(
            vec![signed_tx(&sender, "let counter = counter + 1", 9, 1)],
            &parent_balances,
        );
        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        block.finalize(&validators, &parent_balances, &config).unwrap();

        let balances = block.balances();
        for key in &keys {
            assert_eq!(balances.balance_of(&key.account_id()), 3);
        }
        assert_eq!(balances.balance_of(&AccountId::new("miner")), config.block_reward);
    }

    #[test]
    fn remainder_can_route_to_the_first_signer() {
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);
        let config = Config {
            remainder_target: RemainderTarget::FirstSigner,
            ..test_config()
        };

        let block = sealed(
            vec![signed_tx(&sender, "let counter = counter + 1", 4, 1)],
            &parent_balances,
        );
        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        block.finalize(&validators, &parent_balances, &config).unwrap();

        // share 1 each, remainder 1 to the lexicographically first signer
        let balances = block.balances();
        let first = block.signers_frozen()[0].clone();
        assert_eq!(balances.balance_of(&first), 2);
        assert_eq!(balances.balance_of(&AccountId::new("miner")), config.block_reward);

        let total_signed: u64 = keys
            .iter()
            .map(|k| balances.balance_of(&k.account_id()))
            .sum();
        assert_eq!(total_signed, 4);
    }

    #[test]
    fn identity_is_fixed_across_signing_and_finalization() {
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);

        let block = sealed(
            vec![signed_tx(&sender, "let counter = counter + 1", 1, 1)],
            &parent_balances,
        );
        let sealed_identity = block.identity();

        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        assert_eq!(block.identity(), sealed_identity);

        block
            .finalize(&validators, &parent_balances, &test_config())
            .unwrap();
        assert_eq!(block.identity(), sealed_identity);
    }

    #[test]
    fn genesis_block_is_finalized_with_zero_identity() {
        let block = Block::genesis(counter_state(0), Balances::new());
        assert!(block.is_finalized());
        assert!(block.is_sealed());
        assert_eq!(block.identity(), Hash::zero());
        assert_eq!(block.header.height, 0);
        assert_eq!(block.header.miner, AccountId::new(GENESIS_MINER));
        assert!(block.validator_signatures().is_empty());
        assert!(block.signers_frozen().is_empty());
    }

    #[test]
    fn record_round_trip_preserves_everything() {
        let sender = PrivateKey::new();
        let parent_balances = funded_balances(&[(sender.account_id(), 1000)]);
        let (validators, keys) = validator_set_from(3, 51);

        let block = sealed(
            vec![signed_tx(&sender, "let counter = counter + 1", 1, 1)],
            &parent_balances,
        );
        for key in &keys {
            let (pubkey, signature) = sign_block(&block, key);
            block.add_signature(pubkey, signature, &validators).unwrap();
        }
        block
            .finalize(&validators, &parent_balances, &test_config())
            .unwrap();

        let record = block.to_record();
        let json = serde_json::to_string_pretty(&record).unwrap();
        let parsed: BlockRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let restored = Block::from_record(parsed);
        assert_eq!(restored.identity(), block.identity());
        assert!(restored.is_finalized());
        assert_eq!(restored.balances(), block.balances());
        assert_eq!(restored.signers_frozen(), block.signers_frozen());
        assert_eq!(restored.validator_signatures(), block.validator_signatures());
    }
}
