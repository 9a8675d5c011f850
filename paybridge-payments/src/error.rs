//! Error types for gateway operations

use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Required credential or identity field missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP layer failed or answered with a non-2xx status
    #[error("Transport error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Error description
        message: String,
    },

    /// Response body was not well-formed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Order not found in the order store
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A follow-up call needs an identifier that was never recorded
    #[error("Missing {kind} for order {order}")]
    MissingReference {
        /// Which identifier is missing (authorization id, capture id, ...)
        kind: &'static str,
        /// Order number
        order: String,
    },
}

impl PaymentError {
    /// Configuration errors abort before any network attempt
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for PaymentError {
    fn from(err: quick_xml::Error) -> Self {
        PaymentError::Xml(err.to_string())
    }
}

impl From<url::ParseError> for PaymentError {
    fn from(err: url::ParseError) -> Self {
        PaymentError::Config(format!("invalid endpoint URL: {err}"))
    }
}

/// Result type for gateway operations
pub type PaymentResult<T> = Result<T, PaymentError>;
