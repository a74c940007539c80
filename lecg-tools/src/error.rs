//! Error types for lecg-tools.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lecg-tools operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur while running one of the build-support tools.
#[derive(Error, Debug)]
pub enum ToolError {
    /// An input file does not exist.
    #[error("No such file: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Generic I/O failure reading or writing a file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File or directory the operation was applied to.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File content could not be decoded with the requested text encoding.
    #[error("Cannot decode {} as {encoding}: {message}", path.display())]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Encoding that was attempted.
        encoding: &'static str,
        /// What went wrong.
        message: String,
    },

    /// The external build tool could not be started or waited on.
    #[error("Failed to run '{program}': {source}")]
    Launch {
        /// Program that was launched.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Image decoding, resampling or encoding failed.
    #[error("{source}")]
    Image {
        /// Image file involved.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },
}

impl ToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound { path }
        } else {
            ToolError::Io { path, source }
        }
    }
}
