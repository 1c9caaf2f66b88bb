//! Error types for wave-trace

use std::path::PathBuf;

/// Result type for wave-trace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating or decoding a waveform
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("waveform file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("unsupported waveform format {format} for {path} (only VCD can be decoded)")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("could not detect the waveform format of {path}")]
    UnknownFormat { path: PathBuf },

    #[error("VCD parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
