//! Error types for the musicbot core.
//!
//! Library code returns [`BotError`]; the CLI and transports wrap it in
//! `anyhow` at the edges.

use std::path::PathBuf;

/// Everything that can go wrong inside the core.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// The annotation engine could not process the message text.
    #[error("annotation failed: {0}")]
    Annotation(String),

    /// The artist dictionary could not be read at startup.
    #[error("failed to load artist dictionary from {path}: {source}")]
    Dictionary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network-level failure talking to the music catalog.
    #[error("catalog request failed: {0}")]
    CatalogTransport(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog API error ({status}): {message}")]
    CatalogStatus { status: u16, message: String },

    /// The catalog response could not be decoded.
    #[error("failed to decode catalog response: {0}")]
    CatalogDecode(#[from] serde_json::Error),

    /// Catalog credentials are missing or were rejected.
    #[error("catalog authentication failed: {0}")]
    CatalogAuth(String),
}

impl BotError {
    /// Whether a catalog error is worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::CatalogTransport(_) => true,
            Self::CatalogStatus { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        let err = BotError::CatalogStatus {
            status: 429,
            message: "slow down".into(),
        };
        assert!(err.is_transient());

        let err = BotError::CatalogStatus {
            status: 404,
            message: "missing".into(),
        };
        assert!(!err.is_transient());
        assert!(!BotError::Annotation("empty".into()).is_transient());
    }

    #[test]
    fn test_dictionary_error_names_path() {
        let err = BotError::Dictionary {
            path: PathBuf::from("/nowhere/artists.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/nowhere/artists.txt"));
    }
}
