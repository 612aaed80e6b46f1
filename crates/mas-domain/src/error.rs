//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for auth-state persistence
#[derive(Error, Debug)]
pub enum Error {
    /// Failure establishing a connection to the backing store
    #[error("connection error: {message}")]
    Connection {
        /// Description of the connection failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A store command failed after the connection was established
    #[error("store error: {message}")]
    Store {
        /// Description of the failed command
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("serialization error: {source}")]
    Serialization {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Base64 decoding error inside a tagged binary value
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A stored payload violated the tagged binary convention
    #[error("codec error: {message}")]
    Codec {
        /// Description of the malformed payload
        message: String,
    },

    /// Configuration-related error
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with source
    pub fn store_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Codec and configuration error creation methods
impl Error {
    /// Create a codec error
    pub fn codec<S: Into<String>>(message: S) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
