// Credential primitives: random secrets, opaque ids and bcrypt hashing

use anyhow::{Context, Result};

/// bcrypt cost used for API key hashes, matching the dashboard's own.
pub const API_KEY_HASH_COST: u32 = 10;

/// Random bytes in a generated API key secret (hex doubles the length).
pub const SECRET_BYTES: usize = 32;

/// Random bytes in a generated row id.
pub const ID_BYTES: usize = 12;

// Generate a random row id: 12 CSPRNG bytes, hex encoded
pub fn random_id() -> String {
    let bytes: [u8; ID_BYTES] = rand::random();
    hex::encode(bytes)
}

// Generate a random API key secret: 32 CSPRNG bytes, hex encoded
pub fn random_secret() -> String {
    let bytes: [u8; SECRET_BYTES] = rand::random();
    hex::encode(bytes)
}

/// A salted bcrypt hash, split the way the dashboard stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedHash {
    /// `$2b$<cost>$<22 char salt>`
    pub salt: String,
    /// Full modular-crypt hash; starts with `salt`.
    pub hash: String,
}

// Hash a secret with a freshly generated salt
pub fn hash_secret(secret: &str, cost: u32) -> Result<SaltedHash> {
    let salt_bytes: [u8; 16] = rand::random();
    let parts = bcrypt::hash_with_salt(secret, cost, salt_bytes)
        .context("Failed to hash secret")?;

    Ok(SaltedHash {
        salt: format!("$2b${:02}${}", parts.get_cost(), parts.get_salt()),
        hash: parts.format_for_version(bcrypt::Version::TwoB),
    })
}
