//! Error types for the simulation crate

use thiserror::Error;

/// Main error type for the simulation crate
///
/// Bankruptcy is not an error here: it ends a game through
/// [`crate::player::Bankruptcy`] and is reported as an outcome.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("missing required configuration parameter: '{key}'")]
    MissingParameter { key: String },

    #[error("invalid player type '{input}' (expected one of: always_buy, never_buy, qlearning)")]
    UnknownPlayerType { input: String },

    #[error("invalid reward strategy '{input}' (expected one of: sparse, dense, mixed)")]
    UnknownRewardStrategy { input: String },

    #[error("invalid chance action '{input}' (expected one of: move, pay, receive, skip)")]
    UnknownChanceAction { input: String },

    #[error("field index {index} is out of bounds for a board of size {board_size}")]
    FieldOutOfBounds { index: usize, board_size: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
