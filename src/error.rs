//! Error taxonomy for catalog loading and favorites persistence.

use thiserror::Error;

/// Message shown when a source fails without saying why.
pub const GENERIC_FETCH_MESSAGE: &str = "Failed to load products";

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport or server failure, carrying the server-provided message when there was one.
    #[error("{message}")]
    Fetch { message: String },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("failed to read favorites from {location}: {reason}")]
    PersistenceRead { location: String, reason: String },

    #[error("failed to write favorites to {location}: {reason}")]
    PersistenceWrite { location: String, reason: String },
}

impl CatalogError {
    /// Creates a fetch error, falling back to the generic message when `message` is blank.
    pub fn fetch(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Fetch { message: GENERIC_FETCH_MESSAGE.to_string() }
        } else {
            Self::Fetch { message }
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse { reason: reason.into() }
    }
}
