use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Send or delete failed on the chat platform (other than not-found).
    #[error("platform request failed: {context}: {source}")]
    Platform {
        context: String,
        #[source]
        source: pitwall_channels::Error,
    },

    /// Reading or writing a persisted snapshot failed for reasons other than
    /// corrupt content.
    #[error("storage I/O failed for {}: {source}", path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error("unknown notice category: {tag}")]
    UnknownCategory { tag: String },

    #[error("{message}")]
    InvalidInput { message: String },
}

impl Error {
    #[must_use]
    pub fn platform(context: impl Into<String>, source: pitwall_channels::Error) -> Self {
        Self::Platform {
            context: context.into(),
            source,
        }
    }

    #[must_use]
    pub fn registry_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RegistryIo {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn unknown_category(tag: impl Into<String>) -> Self {
        Self::UnknownCategory { tag: tag.into() }
    }

    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
