//! User credential model

use serde::{Deserialize, Serialize};

/// Stored login credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCredential {
    pub username: String,
    /// Per-user salt mixed into the digest
    pub salt: String,
    /// Hex-encoded SHA-256 digest of `salt:password`
    pub password_hash: String,
}
