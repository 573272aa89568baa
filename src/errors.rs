//! Unified error types and result handling for `Habitude`.
//!
//! Every fallible operation in the crate returns [`Result`], and all I/O-boundary
//! failures are converted into [`Error`] variants rather than panicking. Pure
//! functions (progress engine, statistics aggregator) never fail for in-range
//! input; numeric out-of-range values are clamped, not rejected.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any backend call (empty field, password mismatch).
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of what failed validation
        message: String,
    },

    /// Identity provider rejected the operation (bad credentials, duplicate email).
    #[error("Authentication error: {message}")]
    Auth {
        /// Provider-supplied failure description
        message: String,
    },

    /// An operation that requires an authenticated user was called without one.
    #[error("No user is signed in")]
    NotSignedIn,

    /// Habit lookup by id came up empty.
    #[error("Habit not found: {id}")]
    HabitNotFound {
        /// Id that was looked up
        id: String,
    },

    /// User account row is missing for the given id.
    #[error("User not found: {id}")]
    UserNotFound {
        /// Id that was looked up
        id: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Blob storage operation failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Account deletion removed the user's data but the identity record
    /// could not be deleted. The account is half-gone: the caller must ask
    /// the user to re-authenticate and retry identity deletion.
    #[error("Identity deletion failed after data removal: {message}")]
    IdentityDeletion {
        /// Underlying identity-provider failure
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
