//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;

/// Core library error type
///
/// Services return `anyhow::Result`; these variants travel inside it so
/// callers can `downcast_ref::<Error>()` to react to a specific failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient funds in {account_no}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account_no: String,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("Account {0} is not active")]
    AccountInactive(String),

    #[error("Invalid loan status change: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a permission error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Stable category name, free of account numbers and amounts
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::AccountInactive(_) => "account_inactive",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::PermissionDenied(_) => "permission_denied",
            Self::AuthenticationFailed => "authentication_failed",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_message() {
        let err = Error::InsufficientFunds {
            account_no: "AC00000001".to_string(),
            balance: Decimal::new(5000, 2),
            requested: Decimal::new(10000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in AC00000001: balance 50.00, requested 100.00"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = Error::validation("Amount must be positive").into();
        match err.downcast_ref::<Error>() {
            Some(Error::Validation(msg)) => assert_eq!(msg, "Amount must be positive"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_kind_hides_amounts() {
        let err = Error::InsufficientFunds {
            account_no: "AC00000001".to_string(),
            balance: Decimal::new(5000, 2),
            requested: Decimal::new(10000, 2),
        };
        assert_eq!(err.kind(), "insufficient_funds");
    }
}
