//! Unified error types for the store, the projection engine and the binary.
//!
//! Every variant belongs to exactly one [`ErrorKind`], which is what callers
//! branch on: `InvalidArgument` must be fixed by the caller, `UpstreamUnavailable`
//! may be retried with backoff, `NotFound` means the referenced record does not
//! exist for this user.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Generic invalid input (empty names, malformed month keys, empty updates)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input
        message: String,
    },

    /// Projection horizon outside `1..=max`
    #[error("Invalid horizon: {months} months (must be between 1 and {max})")]
    InvalidHorizon {
        /// Requested horizon
        months: i64,
        /// Largest accepted horizon
        max: u32,
    },

    /// Money amounts must be strictly positive
    #[error("Invalid amount: {amount} (must be greater than zero)")]
    InvalidAmount {
        /// Offending amount
        amount: Decimal,
    },

    /// An interval whose end precedes its start
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Start of the interval
        start: NaiveDate,
        /// End of the interval
        end: NaiveDate,
    },

    /// Operation requires a loaded session
    #[error("No user loaded in session")]
    NoActiveSession,

    /// Unknown user
    #[error("User not found: {user_id}")]
    UserNotFound {
        /// Requested user ID
        user_id: i64,
    },

    /// Unknown (or foreign) budget item
    #[error("Budget item not found: {id}")]
    BudgetItemNotFound {
        /// Requested budget item ID
        id: i64,
    },

    /// Unknown (or foreign) movement
    #[error("Movement not found: {id}")]
    MovementNotFound {
        /// Requested movement ID
        id: i64,
    },

    /// Unknown category
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Category name or ID
        name: String,
    },

    /// Store or API call failed for a reason other than the database driver
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Failure description
        message: String,
    },

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Failure description
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Coarse classification of [`Error`] used by callers to decide what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller must fix the input; never retried
    InvalidArgument,
    /// Backing store failed; caller may retry with backoff
    UpstreamUnavailable,
    /// Referenced record does not exist
    NotFound,
    /// Local configuration or environment problem
    Config,
}

impl Error {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. }
            | Self::InvalidHorizon { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidDateRange { .. }
            | Self::NoActiveSession => ErrorKind::InvalidArgument,
            Self::UserNotFound { .. }
            | Self::BudgetItemNotFound { .. }
            | Self::MovementNotFound { .. }
            | Self::CategoryNotFound { .. } => ErrorKind::NotFound,
            Self::UpstreamUnavailable { .. } | Self::Database(_) => ErrorKind::UpstreamUnavailable,
            Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) => ErrorKind::Config,
        }
    }

    /// Only upstream failures are worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::UpstreamUnavailable)
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
