//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so the ledger taxonomy
//! (not found / conflict / invariant / validation) reaches the caller intact.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Ledger taxonomy
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost an optimistic race; reload and retry.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record's state (or its open service) forbids the call. Retrying
    /// the same call cannot succeed.
    #[error("Conflict: {0}")]
    StateConflict(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// True when retrying the same call may succeed: a lost optimistic race or
    /// a database held by another writer.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Conflict(_) => true,
            AppError::Db(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl AppError {
    /// Process exit status for the CLI, one per ledger error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::Validation(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Conflict(_) | AppError::StateConflict(_) => 4,
            AppError::InvariantViolation(_) => 5,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
