//! Error types for the dorecord module
//!
//! Every failure is terminal for the invocation: nothing in this crate
//! retries or recovers locally. The binary turns an [`Error`] into the
//! failure envelope via [`crate::module::ModuleResult::failure`].

use thiserror::Error;

/// Result type alias for dorecord operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dorecord module
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid parameter or credential, detected before any
    /// network call is made
    #[error("{0}")]
    Config(String),

    /// Fault reported by the remote service: authentication failure,
    /// malformed request, transport fault, unexpected response
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message as reported by the provider
        message: String,
    },

    /// The declared domain does not exist on the provider
    #[error("{0}")]
    NotFound(String),

    /// A provider call on a known record did not complete in time
    #[error("{message}")]
    Timeout {
        /// Error message
        message: String,
        /// Identifier of the affected record
        id: u64,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a timeout error for the record `id`
    pub fn timeout(msg: impl Into<String>, id: u64) -> Self {
        Self::Timeout {
            message: msg.into(),
            id,
        }
    }

    /// Record identifier carried by timeout-class failures
    pub fn record_id(&self) -> Option<u64> {
        match self {
            Self::Timeout { id, .. } => Some(*id),
            _ => None,
        }
    }
}
