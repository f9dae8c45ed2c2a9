//! Error types for `ticketflow-core`.
//!
//! Form validation failures are not errors: they are collected into
//! [`FieldErrors`](crate::validate::FieldErrors) and shown on the re-rendered
//! form. [`CoreError`] covers values that cannot be interpreted at all.

/// Unified error type for core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A ticket status outside `open`, `in_progress`, `closed`.
    #[error("invalid ticket status: {0}")]
    InvalidStatus(String),

    /// A ticket priority outside `low`, `medium`, `high`.
    #[error("invalid ticket priority: {0}")]
    InvalidPriority(String),
}

/// Convenience alias used throughout `ticketflow-core`.
pub type CoreResult<T> = Result<T, CoreError>;
