//! Mail errors.

use thiserror::Error;

/// Errors preparing a summary email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A required setting is absent.
    #[error("SMTP configuration missing: {0}")]
    MissingConfig(&'static str),

    /// An address did not parse.
    #[error("Invalid address '{address}': {message}")]
    InvalidAddress {
        /// The offending address.
        address: String,
        /// Parser message.
        message: String,
    },

    /// The MIME message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(String),
}

impl MailError {
    /// Create an invalid address error.
    pub fn invalid_address(address: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            message: message.to_string(),
        }
    }
}

/// Errors from the SMTP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// STARTTLS negotiation failed.
    #[error("TLS negotiation failed: {0}")]
    Tls(String),

    /// Connecting or sending failed.
    #[error("Send failed: {0}")]
    Send(String),
}

impl TransportError {
    /// Check if this is a TLS negotiation failure.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;
