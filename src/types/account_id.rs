//! Account identifiers.

use crate::types::canonical::{Canonical, CanonicalSink};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier: the hex-encoded public key of the account.
///
/// The identifier doubles as the verification key — signature checks parse it
/// back into a curve point. Non-signing ledger entries (the genesis miner) may
/// use an opaque label instead; such accounts can hold balance but can never
/// produce a valid signature.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Canonical for AccountId {
    fn encode<S: CanonicalSink>(&self, out: &mut S) {
        self.0.encode(out);
    }
}
