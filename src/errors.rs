//! Unified error types and result handling for the screening engine.
//!
//! All fallible operations in the crate return [`Result`] with this error type.
//! Collaborator failures (database fetch errors, timeouts) are surfaced as the
//! distinguished [`Error::Unavailable`] variant so callers can fall back to the
//! safe default decision instead of failing an interaction.

use thiserror::Error;

/// Unified error type for all screening operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Rule/contact/settings fetch failed or timed out; callers should apply
    /// the safe default decision rather than failing the interaction
    #[error("Screening data unavailable: {message}")]
    Unavailable { message: String },

    /// Account lookup by id found nothing
    #[error("Account not found: {id}")]
    AccountNotFound { id: i64 },

    /// Contact lookup by id found nothing
    #[error("Contact not found: {id}")]
    ContactNotFound { id: i64 },

    /// Call rule lookup by id found nothing
    #[error("Call rule not found: {id}")]
    RuleNotFound { id: i64 },

    /// Message lookup by id found nothing
    #[error("Message not found: {id}")]
    MessageNotFound { id: i64 },

    /// Session id is neither active nor persisted
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Contact priority outside the allowed 1-10 range; rejected, never clamped
    #[error("Priority {value} is outside the allowed range 1-10")]
    PriorityOutOfRange { value: i32 },

    /// A string field did not match any known enumeration value
    #[error("Unknown {field} value: {value}")]
    UnknownVariant { field: &'static str, value: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
