//! Account addresses
//!
//! An address is the SHA-256 digest of the public key's SubjectPublicKeyInfo
//! PEM text, hex encoded.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of an address in hex characters
pub const ADDRESS_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Derive the address for a PEM-encoded public key
    pub fn from_public_pem(public_pem: &str) -> Self {
        let digest = Sha256::digest(public_pem.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that `candidate` has the shape of an address (64 lowercase hex chars)
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == ADDRESS_HEX_LEN
            && candidate
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
