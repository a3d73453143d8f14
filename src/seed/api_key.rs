// API key issuing for the first dashboard user

use sqlx::sqlite::SqliteConnection;
use std::fmt;

use crate::auth::{self, API_KEY_HASH_COST};
use crate::db;
use crate::error::{DbResultExt, SeedError};

/// A freshly issued key. The secret exists only here; the store keeps its hash.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedApiKey {
    pub id: String,
    pub user_id: String,
    secret: String,
}

impl IssuedApiKey {
    /// `<id>.<secret>`, the form clients present to the dashboard.
    pub fn token(&self) -> String {
        format!("{}.{}", self.id, self.secret)
    }
}

// Keep the secret out of logs and panic messages
impl fmt::Debug for IssuedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedApiKey")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

pub async fn issue_api_key(conn: &mut SqliteConnection) -> Result<IssuedApiKey, SeedError> {
    issue_api_key_with_cost(conn, API_KEY_HASH_COST).await
}

pub async fn issue_api_key_with_cost(
    conn: &mut SqliteConnection,
    cost: u32,
) -> Result<IssuedApiKey, SeedError> {
    let user_id = db::first_user_id(conn).await.db_err()?.ok_or(SeedError::NoUser)?;

    let secret = auth::random_secret();
    let salted = auth::hash_secret(&secret, cost).map_err(|e| SeedError::Hashing(format!("{:#}", e)))?;
    let id = auth::random_id();

    db::insert_api_key(conn, &id, &salted.hash, &salted.salt, &user_id)
        .await
        .db_err()?;

    tracing::info!(key_id = %id, user_id = %user_id, "issued API key");

    Ok(IssuedApiKey { id, user_id, secret })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let key = IssuedApiKey {
            id: "0123456789abcdef01234567".to_string(),
            user_id: "u1".to_string(),
            secret: "deadbeef".to_string(),
        };

        let debug = format!("{:?}", key);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(key.token(), "0123456789abcdef01234567.deadbeef");
    }
}
