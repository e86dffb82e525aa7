//! Operator credentials
//!
//! Passwords are stored as a hex SHA-256 digest of `salt:password`.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use shared::UserCredential;
use tracing::{info, warn};

use crate::repository::{OrderStorage, StorageResult};

/// Salt length in hex characters
const SALT_LEN: usize = 16;

/// Hex SHA-256 digest of `salt:password`
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hex salt drawn from the operating system RNG
fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN / 2];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Build a credential with a fresh salt
pub fn new_credential(username: &str, password: &str) -> UserCredential {
    let salt = generate_salt();

    UserCredential {
        username: username.to_string(),
        password_hash: hash_password(&salt, password),
        salt,
    }
}

/// Check a password against a stored credential
pub fn verify_password(credential: &UserCredential, password: &str) -> bool {
    let computed = hash_password(&credential.salt, password);
    constant_time_eq(computed.as_bytes(), credential.password_hash.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Look up `username` and check the password
///
/// Unknown users and wrong passwords both yield `Ok(false)`.
pub fn authenticate(storage: &OrderStorage, username: &str, password: &str) -> StorageResult<bool> {
    let Some(credential) = storage.get_user(username)? else {
        warn!(username, "login rejected: unknown user");
        return Ok(false);
    };

    if verify_password(&credential, password) {
        info!(username, "login accepted");
        Ok(true)
    } else {
        warn!(username, "login rejected: wrong password");
        Ok(false)
    }
}
