//! Script state and account balance mappings.
//!
//! Both mappings follow the same snapshot discipline: blocks own immutable
//! copies, and execution always produces a fresh copy instead of mutating the
//! input. Keys are validated on the way in; values are fixed-width integers
//! with checked arithmetic at every mutation site.

use crate::types::account_id::AccountId;
use crate::types::canonical::{Canonical, CanonicalSink};
use quorumchain_derive::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum byte length of a state variable identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Returns `true` for identifiers of the form `[A-Za-z_][A-Za-z0-9_]*`, at
/// most [`MAX_IDENTIFIER_LEN`] bytes.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Errors raised by state and balance mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// Variable name outside the documented identifier grammar.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Balance credit would exceed the representable range.
    #[error("balance overflow for account {0}")]
    BalanceOverflow(AccountId),
}

/// Script-visible state: validated identifiers mapped to signed integers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(BTreeMap<String, i64>);

impl State {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    /// Binds `name` to `value`, replacing any previous binding.
    ///
    /// Rejects identifiers outside the documented grammar; values cover the
    /// full `i64` range.
    pub fn bind(&mut self, name: &str, value: i64) -> Result<(), StateError> {
        if !is_valid_identifier(name) {
            return Err(StateError::InvalidIdentifier(name.to_string()));
        }
        self.0.insert(name.to_string(), value);
        Ok(())
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates bindings in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.0.iter()
    }
}

impl Canonical for State {
    fn encode<S: CanonicalSink>(&self, out: &mut S) {
        self.0.encode(out);
    }
}

impl FromIterator<(String, i64)> for State {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Account balances: non-negative integers keyed by account identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<AccountId, u64>);

impl Balances {
    /// Creates an empty balance table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account`, zero for unknown accounts.
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.0.get(account).copied().unwrap_or(0)
    }

    /// Sets the balance of `account` outright.
    pub fn set(&mut self, account: AccountId, amount: u64) {
        self.0.insert(account, amount);
    }

    /// Adds `amount` to the account, failing on overflow instead of wrapping.
    pub fn credit(&mut self, account: &AccountId, amount: u64) -> Result<(), StateError> {
        let current = self.balance_of(account);
        let next = current
            .checked_add(amount)
            .ok_or_else(|| StateError::BalanceOverflow(account.clone()))?;
        self.0.insert(account.clone(), next);
        Ok(())
    }

    /// Sum of all balances, widened so the total itself cannot overflow.
    pub fn total(&self) -> u128 {
        self.0.values().map(|v| *v as u128).sum()
    }

    /// Number of accounts with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no account has an entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in ascending account order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &u64)> {
        self.0.iter()
    }
}

impl Canonical for Balances {
    fn encode<S: CanonicalSink>(&self, out: &mut S) {
        self.0.encode(out);
    }
}

impl FromIterator<(AccountId, u64)> for Balances {
    fn from_iter<I: IntoIterator<Item = (AccountId, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
