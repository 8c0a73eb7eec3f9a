//! Schnorr signature key pairs on secp256k1.
//!
//! The rest of the crate treats signing as an opaque capability: messages in,
//! hex signatures out, and a total `verify` that answers `false` for anything
//! malformed instead of surfacing parse errors. Key custody (encrypted wallet
//! files, passphrases) belongs to the surrounding node, not here.

use crate::types::account_id::AccountId;
use k256::ecdsa::signature::Signer;
use k256::schnorr::signature::Verifier;
use k256::schnorr::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;

/// Private key for signing transactions and blocks.
///
/// Generated from OS entropy; never serialized by this crate.
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

impl PrivateKey {
    /// Generates a new random private key.
    pub fn new() -> Self {
        let mut rng = OsRng;
        Self {
            key: SigningKey::random(&mut rng),
        }
    }

    /// Creates a private key from raw bytes.
    ///
    /// Returns `None` if the bytes are not a valid secp256k1 scalar.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        SigningKey::from_bytes(bytes).ok().map(|key| Self { key })
    }

    /// Derives the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key: *self.key.verifying_key(),
        }
    }

    /// The account identifier of this key: the hex public key.
    pub fn account_id(&self) -> AccountId {
        self.public_key().account_id()
    }

    /// Signs a message, returning the hex-encoded Schnorr signature.
    pub fn sign(&self, message: &[u8]) -> String {
        let signature: Signature = self.key.sign(message);
        hex::encode(signature.to_bytes())
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

/// Public key for signature verification and account identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    key: VerifyingKey,
}

impl PublicKey {
    /// The account identifier: lowercase hex of the 32-byte x-only key.
    pub fn account_id(&self) -> AccountId {
        AccountId::new(hex::encode(self.key.to_bytes()))
    }

    /// Verifies a hex signature over `message`.
    pub fn verify(&self, message: &[u8], signature_hex: &str) -> bool {
        let Ok(bytes) = hex::decode(signature_hex) else {
            return false;
        };
        if bytes.len() != 64 {
            return false;
        }
        let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
            return false;
        };
        self.key.verify(message, &signature).is_ok()
    }
}

/// Verifies `signature_hex` over `message` under the public key named by
/// `pubkey`.
///
/// Total: malformed key hex, malformed signature hex, and opaque non-key
/// identifiers all verify as `false`. The admission path stays exception-free
/// for every expected failure mode.
pub fn verify(pubkey: &AccountId, message: &[u8], signature_hex: &str) -> bool {
    let Ok(key_bytes) = hex::decode(pubkey.as_str()) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    PublicKey { key }.verify(message, signature_hex)
}
