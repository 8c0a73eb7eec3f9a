//! Companion snapshot documents.
//!
//! `state.json` wraps the working state, `balances.json` the working
//! balances, and `validators.json` carries the roster plus its quorum rule.
//! All three use the same atomic write-then-rename as the block store.

use crate::core::validator_set::{ValidatorInfo, ValidatorSet, ValidatorSetError};
use crate::storage::block_store::StoreError;
use crate::types::state::{Balances, State};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// `state.json`: `{"state": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: State,
}

/// `balances.json`: `{"balances": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancesSnapshot {
    pub balances: Balances,
}

/// `validators.json`: the roster and quorum percentage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorsDocument {
    pub validators: Vec<ValidatorInfo>,
    pub quorum_percent: u8,
}

impl ValidatorsDocument {
    /// Builds the validated in-memory set from the document.
    pub fn to_set(&self) -> Result<ValidatorSet, ValidatorSetError> {
        ValidatorSet::new(self.validators.clone(), self.quorum_percent)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let data = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Malformed(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let data = fs::read(path)?;
    serde_json::from_slice(&data).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Writes the working state snapshot.
pub fn save_state(path: impl AsRef<Path>, state: &State) -> Result<(), StoreError> {
    write_json(
        path.as_ref(),
        &StateSnapshot {
            state: state.clone(),
        },
    )
}

/// Reads the working state snapshot.
pub fn load_state(path: impl AsRef<Path>) -> Result<State, StoreError> {
    read_json::<StateSnapshot>(path.as_ref()).map(|snapshot| snapshot.state)
}

/// Writes the working balances snapshot.
pub fn save_balances(path: impl AsRef<Path>, balances: &Balances) -> Result<(), StoreError> {
    write_json(
        path.as_ref(),
        &BalancesSnapshot {
            balances: balances.clone(),
        },
    )
}

/// Reads the working balances snapshot.
pub fn load_balances(path: impl AsRef<Path>) -> Result<Balances, StoreError> {
    read_json::<BalancesSnapshot>(path.as_ref()).map(|snapshot| snapshot.balances)
}

/// Writes the validator roster document.
pub fn save_validators(
    path: impl AsRef<Path>,
    document: &ValidatorsDocument,
) -> Result<(), StoreError> {
    write_json(path.as_ref(), document)
}

/// Reads the validator roster document.
pub fn load_validators(path: impl AsRef<Path>) -> Result<ValidatorsDocument, StoreError> {
    read_json(path.as_ref())
}
