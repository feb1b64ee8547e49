/// Centralized error types for the CTA base crate
use thiserror::Error;

use crate::types::StopOrderStatus;

#[derive(Error, Debug)]
pub enum TradingError {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    // Order Errors
    #[error("Stop order {stop_order_id} already {status}")]
    StopOrderFinalized {
        stop_order_id: String,
        status: StopOrderStatus,
    },

    // File I/O Errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TradingError>;

impl TradingError {
    pub(crate) fn unknown_variant(kind: &'static str, value: &str) -> Self {
        TradingError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }

    /// Check if error was raised while loading configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TradingError::ConfigError(_) | TradingError::UnknownVariant { .. }
        )
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            TradingError::ConfigError(_) => "CFG_001",
            TradingError::InvalidParameter(_) => "CFG_002",
            TradingError::UnknownVariant { .. } => "CFG_003",
            TradingError::StopOrderFinalized { .. } => "ORDER_001",
            TradingError::FileError(_) => "FILE_001",
            TradingError::DeserializationError(_) => "DATA_001",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TradingError::ConfigError("bad".to_string());
        assert_eq!(err.error_code(), "CFG_001");
        assert!(err.is_config_error());

        let err = TradingError::StopOrderFinalized {
            stop_order_id: "STOP.1".to_string(),
            status: StopOrderStatus::Cancelled,
        };
        assert_eq!(err.error_code(), "ORDER_001");
        assert!(!err.is_config_error());
        assert_eq!(err.to_string(), "Stop order STOP.1 already CANCELLED");
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = TradingError::unknown_variant("engine type", "paper");
        assert_eq!(err.to_string(), "Unknown engine type value: \"paper\"");
    }
}
