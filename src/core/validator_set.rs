//! Validator membership and quorum arithmetic.

use crate::types::account_id::AccountId;
use quorumchain_derive::Error;
use serde::{Deserialize, Serialize};

/// A designated validator: signing key plus a human-readable label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    /// Hex public key; the identity signatures are checked against.
    pub pubkey: AccountId,
    /// Display name.
    pub name: String,
}

/// Errors constructing a validator set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorSetError {
    /// Quorum percentage outside `1..=100`.
    #[error("quorum percent {0} outside 1..=100")]
    InvalidQuorumPercent(u8),
}

/// The designated validator roster and its quorum rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorSet {
    validators: Vec<ValidatorInfo>,
    quorum_percent: u8,
}

impl ValidatorSet {
    /// Creates a validator set, validating the quorum percentage.
    pub fn new(
        validators: Vec<ValidatorInfo>,
        quorum_percent: u8,
    ) -> Result<Self, ValidatorSetError> {
        if quorum_percent == 0 || quorum_percent > 100 {
            return Err(ValidatorSetError::InvalidQuorumPercent(quorum_percent));
        }
        Ok(Self {
            validators,
            quorum_percent,
        })
    }

    /// Returns `true` if `pubkey` names a member of the set.
    pub fn contains(&self, pubkey: &AccountId) -> bool {
        self.validators.iter().any(|v| &v.pubkey == pubkey)
    }

    /// Number of designated validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Minimum distinct signatures needed to finalize:
    /// `ceil(len * quorum_percent / 100)`.
    pub fn quorum(&self) -> usize {
        (self.validators.len() * self.quorum_percent as usize).div_ceil(100)
    }

    /// The configured quorum percentage.
    pub fn quorum_percent(&self) -> u8 {
        self.quorum_percent
    }

    /// Iterates the roster in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorInfo> {
        self.validators.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize, quorum_percent: u8) -> ValidatorSet {
        let validators = (0..n)
            .map(|i| ValidatorInfo {
                pubkey: AccountId::new(format!("key{i}")),
                name: format!("Val-{i}"),
            })
            .collect();
        ValidatorSet::new(validators, quorum_percent).unwrap()
    }

    #[test]
    fn quorum_rounds_up() {
        // ceil(3 * 0.51) = ceil(1.53) = 2
        assert_eq!(set_of(3, 51).quorum(), 2);
        assert_eq!(set_of(3, 100).quorum(), 3);
        assert_eq!(set_of(4, 50).quorum(), 2);
        assert_eq!(set_of(5, 51).quorum(), 3);
        assert_eq!(set_of(1, 1).quorum(), 1);
    }

    #[test]
    fn empty_set_has_zero_quorum() {
        assert_eq!(set_of(0, 51).quorum(), 0);
    }

    #[test]
    fn membership_check() {
        let set = set_of(2, 51);
        assert!(set.contains(&AccountId::new("key0")));
        assert!(!set.contains(&AccountId::new("stranger")));
    }

    #[test]
    fn rejects_out_of_range_percent() {
        assert_eq!(
            ValidatorSet::new(vec![], 0),
            Err(ValidatorSetError::InvalidQuorumPercent(0))
        );
        assert_eq!(
            ValidatorSet::new(vec![], 101),
            Err(ValidatorSetError::InvalidQuorumPercent(101))
        );
    }
}
