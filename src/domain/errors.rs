//! Domain error types
//!
//! This module defines the error hierarchy for journal-search.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// Used by the configuration layer, the FHIR client and the caller boundary.
/// The search core itself never returns it to callers: every failure there is
/// normalized into an empty result list.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// FHIR server errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is missing a required role
    #[error("Access denied: {0}")]
    Authorization(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// FHIR-specific errors
///
/// Errors that occur when talking to the FHIR resource server.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FhirError {
    /// Failed to connect to the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl FhirError {
    /// Whether repeating the request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FhirError::ConnectionFailed(_) | FhirError::ServerError { .. } | FhirError::Timeout(_)
        )
    }
}

impl SearchError {
    /// Whether repeating the operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Fhir(e) => e.is_retryable(),
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Configuration(format!("TOML parse error: {err}"))
    }
}
