// Error handling for boardseed

use std::fmt;

/// Seeder error type
#[derive(Debug)]
pub enum SeedError {
    NoUser,
    Config(String),
    InvalidSetting(String),
    Hashing(String),
    Database(String),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::NoUser => write!(f, "No user found"),
            SeedError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SeedError::InvalidSetting(msg) => write!(f, "Invalid server setting: {}", msg),
            SeedError::Hashing(msg) => write!(f, "Hashing error: {}", msg),
            SeedError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SeedError {}

impl SeedError {
    /// Process exit code for this error.
    /// A missing precondition exits 1, anything unexpected exits 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            SeedError::NoUser => 1,
            _ => 2,
        }
    }
}

// Extension trait for database result handling
pub trait DbResultExt<T> {
    /// Convert database errors to SeedError::Database
    fn db_err(self) -> Result<T, SeedError>;
}

impl<T, E: fmt::Display> DbResultExt<T> for Result<T, E> {
    fn db_err(self) -> Result<T, SeedError> {
        // {:#} keeps the anyhow context chain on one line
        self.map_err(|e| SeedError::Database(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SeedError::NoUser.exit_code(), 1);
        assert_eq!(SeedError::Database("locked".to_string()).exit_code(), 2);
        assert_eq!(SeedError::Config("bad yaml".to_string()).exit_code(), 2);
    }

    #[test]
    fn test_db_err_keeps_context() {
        let result: anyhow::Result<()> =
            Err(anyhow::anyhow!("no such table: item").context("Failed to count items"));
        let err = result.db_err().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Database error: Failed to count items: no such table: item"
        );
    }
}
