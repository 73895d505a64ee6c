//! Provider errors

use thiserror::Error;

/// Errors raised by provider implementations
#[derive(Debug, Error)]
pub enum BackendError {
    /// No usable API credential in the environment
    #[error("API key not set (looked in {variables})")]
    MissingCredential {
        /// Environment variables that were checked
        variables: String,
    },

    /// The provider answered with a non-success status
    #[error("{provider} returned {status}: {message}")]
    Http {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message extracted from the body
        message: String,
    },

    /// The request never produced a response
    #[error("request to {provider} failed: {source}")]
    Transport {
        /// Provider name
        provider: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// The response body could not be understood
    #[error("invalid response from {provider}: {reason}")]
    InvalidResponse {
        /// Provider name
        provider: String,
        /// What was wrong with it
        reason: String,
    },

    /// The response contained no text
    #[error("{provider} returned no text in its response")]
    EmptyResponse {
        /// Provider name
        provider: String,
    },
}
