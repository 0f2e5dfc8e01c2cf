// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for livetap
//!
//! One error enum covers the tap side (fetch, duplication, relay) and the
//! collector side (storage, request decoding).

use thiserror::Error;

/// Result type alias for livetap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for livetap
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Body stream failed mid-read
    #[error("Body stream error: {0}")]
    Stream(String),

    /// Relay delivery failed
    #[error("Relay to {endpoint} failed: {reason}")]
    Relay {
        endpoint: String,
        status: Option<u16>,
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chat storage error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a body stream error
    pub fn stream<S: Into<String>>(msg: S) -> Self {
        Error::Stream(msg.into())
    }

    /// Create a relay error without a status
    pub fn relay(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Relay {
            endpoint: endpoint.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// Create a relay error for a non-success status
    pub fn relay_status(endpoint: impl Into<String>, status: u16) -> Self {
        Error::Relay {
            endpoint: endpoint.into(),
            status: Some(status),
            reason: format!("endpoint answered {}", status),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a body stream error
    pub fn is_stream(&self) -> bool {
        matches!(self, Error::Stream(_))
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Relay { .. })
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Relay { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}
