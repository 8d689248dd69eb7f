//! Error types for the ht health tracker.

use std::io;

/// Result type alias for ht operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the ht health tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Food name collided with an existing row and could not be re-read.
    #[error("Food '{0}' conflicts with an existing row; retry the operation")]
    FoodConflict(String),

    /// Food row referenced by an eat entry does not exist.
    #[error("Food #{0} not found")]
    FoodNotFound(i64),

    /// Eat entry not found.
    #[error("Eat entry #{0} not found")]
    EatNotFound(i64),

    /// Schema is missing from the database.
    #[error("Schema not initialized. Run `ht --create-tables` first")]
    NotInitialized,

    /// A stored timestamp failed to parse.
    #[error("Invalid timestamp in database: {0}")]
    InvalidTimestamp(String),
}

/// Check whether a rusqlite error is a uniqueness-constraint violation.
///
/// Distinguishes "row absent, safe to insert" from "insert lost a race and
/// must be retried or surfaced".
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unique_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (name TEXT UNIQUE)", [])
            .unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap();

        let err = conn
            .execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap_err();
        assert!(is_unique_violation(&err));

        let other = conn
            .execute("INSERT INTO missing VALUES (1)", [])
            .unwrap_err();
        assert!(!is_unique_violation(&other));
    }

    #[test]
    fn test_error_display() {
        let err = Error::FoodConflict("apple".to_string());
        assert!(err.to_string().contains("apple"));

        let err = Error::NotInitialized;
        assert!(err.to_string().contains("--create-tables"));
    }
}
