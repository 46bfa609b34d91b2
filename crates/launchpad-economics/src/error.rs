//! Error types for tokenomics simulation and token launches

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tokenomics operations
pub type Result<T> = std::result::Result<T, TokenomicsError>;

pub const DEFAULT_ADDITION_OVERFLOW_ERROR: &str = "Addition overflow";
pub const DEFAULT_MULTIPLICATION_OVERFLOW_ERROR: &str = "Multiplication overflow";
pub const DEFAULT_UNDERFLOW_ERROR: &str = "Arithmetic underflow";
pub const DEFAULT_DIVISION_ERROR: &str = "Division failed";
pub const DEFAULT_INVALID_AMOUNT_ERROR: &str = "Invalid amount";
pub const DEFAULT_MINIMUM_REQUIRED_ERROR: &str = "Minimum amount not met";

/// Errors surfaced by the tokenomics engine and the launch registry.
///
/// Serialized with an internal `kind` tag so callers across a transport
/// boundary receive a tagged value they can match on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TokenomicsError {
    // === Parameter Validation ===
    /// A launch parameter failed validation
    #[error("{reason}: {details}")]
    InvalidAmount { reason: String, details: String },

    /// Caller-level precondition such as the creation fee
    #[error("Minimum required: {required} e8s of {token}, provided {provided} ({details})")]
    MinimumRequired {
        required: u64,
        provided: u64,
        token: String,
        details: String,
    },

    // === Arithmetic ===
    /// Sum exceeds the representable range
    #[error("{operation}: {details}")]
    AdditionOverflow { operation: String, details: String },

    /// Product exceeds the representable range
    #[error("{operation}: {details}")]
    MultiplicationOverflow { operation: String, details: String },

    /// Subtraction would go negative
    #[error("{operation}: {details}")]
    Underflow { operation: String, details: String },

    /// Division by zero
    #[error("{operation}: {details}")]
    DivisionFailed { operation: String, details: String },

    // === Launch Registry ===
    /// Malformed request outside the numeric parameters
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Unknown token record
    #[error("Token not found: {id}")]
    TokenNotFound { id: u64 },
}

impl TokenomicsError {
    pub fn invalid_amount(reason: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
            details: details.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Tag used in the serialized form
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "InvalidAmount",
            Self::MinimumRequired { .. } => "MinimumRequired",
            Self::AdditionOverflow { .. } => "AdditionOverflow",
            Self::MultiplicationOverflow { .. } => "MultiplicationOverflow",
            Self::Underflow { .. } => "Underflow",
            Self::DivisionFailed { .. } => "DivisionFailed",
            Self::InvalidInput { .. } => "InvalidInput",
            Self::TokenNotFound { .. } => "TokenNotFound",
        }
    }

    /// Stable numeric code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidAmount { .. } => 2001,
            Self::MinimumRequired { .. } => 2002,
            Self::AdditionOverflow { .. } => 2101,
            Self::MultiplicationOverflow { .. } => 2102,
            Self::Underflow { .. } => 2103,
            Self::DivisionFailed { .. } => 2104,
            Self::InvalidInput { .. } => 2201,
            Self::TokenNotFound { .. } => 2202,
        }
    }

    /// Arithmetic failures that abort a simulation
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            Self::AdditionOverflow { .. }
                | Self::MultiplicationOverflow { .. }
                | Self::Underflow { .. }
                | Self::DivisionFailed { .. }
        )
    }

    /// Human-readable detail string for presentation
    pub fn details(&self) -> String {
        match self {
            Self::InvalidAmount { details, .. }
            | Self::MinimumRequired { details, .. }
            | Self::AdditionOverflow { details, .. }
            | Self::MultiplicationOverflow { details, .. }
            | Self::Underflow { details, .. }
            | Self::DivisionFailed { details, .. } => details.clone(),
            Self::InvalidInput { reason } => reason.clone(),
            Self::TokenNotFound { id } => format!("no token record with id {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TokenomicsError::invalid_amount("zero supply", "primary_max_supply: 0");
        assert_eq!(err.code(), 2001);
        assert_eq!(err.kind(), "InvalidAmount");

        let err = TokenomicsError::TokenNotFound { id: 7 };
        assert_eq!(err.code(), 2202);
    }

    #[test]
    fn test_error_display() {
        let err = TokenomicsError::MultiplicationOverflow {
            operation: "epoch mint".to_string(),
            details: "lhs: 2 with rhs: 3".to_string(),
        };

        let msg = format!("{}", err);
        assert!(msg.contains("epoch mint"));
        assert!(msg.contains("lhs: 2"));
    }

    #[test]
    fn test_engine_failures() {
        assert!(TokenomicsError::Underflow {
            operation: "headroom".to_string(),
            details: String::new(),
        }
        .is_engine_failure());
        assert!(!TokenomicsError::invalid_input("empty name").is_engine_failure());
    }

    #[test]
    fn test_tagged_serialization() {
        let err = TokenomicsError::DivisionFailed {
            operation: "marginal cost".to_string(),
            details: "divisor is zero".to_string(),
        };

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "DivisionFailed");
        assert_eq!(json["operation"], "marginal cost");

        let back: TokenomicsError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
