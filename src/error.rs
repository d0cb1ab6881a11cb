// src/error.rs

use crate::packages::PackageIdentifier;
use crate::resolver::Diagnostic;
use thiserror::Error;

/// Core error types for gemlock
#[derive(Error, Debug)]
pub enum Error {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a specification import
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database initialization error
    #[error("Failed to initialize database: {0}")]
    InitError(String),

    /// Database not found
    #[error("Database not found at path: {0}")]
    DatabaseNotFound(String),

    /// Version string that cannot be parsed
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// Requirement string that cannot be parsed
    #[error("Invalid version requirement '{0}'")]
    InvalidConstraint(String),

    /// Full name that does not split into NAME-VERSION
    #[error("Invalid package identifier '{0}' (expected NAME-VERSION)")]
    InvalidIdentifier(String),

    /// Lockfile statement that cannot be read back
    #[error("Invalid lockfile statement on line {line}: {text}")]
    InvalidLockfile { line: usize, text: String },

    /// No installed specification exists for an identifier that was
    /// named as a root or selected as a candidate
    #[error("Specification not found for {0}")]
    SpecificationNotFound(PackageIdentifier),

    /// A dependency has no installed candidate and strict mode is on
    #[error("{}", .0.message())]
    UnsatisfiableDependency(Box<Diagnostic>),
}

/// Result type alias using gemlock's Error type
pub type Result<T> = std::result::Result<T, Error>;
