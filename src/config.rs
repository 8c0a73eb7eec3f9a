//! Runtime configuration.
//!
//! A `Config` value is passed explicitly into every operation that needs one;
//! there is no process-wide configuration state. All fields have defaults so a
//! partially specified JSON document deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Ordering policy for the mempool queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueMode {
    /// Highest premium first, sequence number as tie-breaker.
    Priority,
    /// Strict insertion order.
    Arrival,
}

/// Where the integer remainder of the premium split is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderTarget {
    /// Credit the block's miner.
    Miner,
    /// Credit the lexicographically first frozen signer.
    FirstSigner,
}

/// Bounds on accepted scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLimits {
    /// Maximum number of statements per script.
    pub max_statements: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self { max_statements: 256 }
    }
}

/// Chain-level operating parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum transactions selected into one block.
    pub block_tx_cap: usize,
    /// Fixed reward credited to the miner on finalization.
    pub block_reward: u64,
    /// Minimum premium a transaction must offer to be admitted.
    pub min_premium: u64,
    /// Mempool ordering policy.
    pub queue_mode: QueueMode,
    /// Leading zero bits the sealed block hash must carry.
    pub difficulty_bits: u32,
    /// Routing for the non-divisible part of the premium split.
    pub remainder_target: RemainderTarget,
    /// Script acceptance bounds.
    pub script_limits: ScriptLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_tx_cap: 3,
            block_reward: 5,
            min_premium: 0,
            queue_mode: QueueMode::Priority,
            difficulty_bits: 20,
            remainder_target: RemainderTarget::Miner,
            script_limits: ScriptLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = Config::default();
        assert_eq!(config.block_tx_cap, 3);
        assert_eq!(config.block_reward, 5);
        assert_eq!(config.min_premium, 0);
        assert_eq!(config.queue_mode, QueueMode::Priority);
        assert_eq!(config.difficulty_bits, 20);
        assert_eq!(config.remainder_target, RemainderTarget::Miner);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"block_reward": 9}"#).unwrap();
        assert_eq!(config.block_reward, 9);
        assert_eq!(config.block_tx_cap, 3);
    }

    #[test]
    fn queue_mode_uses_snake_case() {
        let config: Config = serde_json::from_str(r#"{"queue_mode": "arrival"}"#).unwrap();
        assert_eq!(config.queue_mode, QueueMode::Arrival);
    }
}
