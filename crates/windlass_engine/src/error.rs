//! Engine error types
//!
//! Three tiers, matching how far each problem is allowed to travel:
//!
//! - [`ConfigError`] aborts the build before any file is scanned
//! - [`ScanWarning`] is logged and collected; the build continues
//! - [`crate::Rejection`] (an unusable class token) is discarded silently
//!   unless diagnostics are requested

use std::path::PathBuf;

use thiserror::Error;
use windlass_theme::ThemeError;

/// Fatal configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// A `content` entry is not a valid glob
    #[error("invalid pattern in `content[{index}]` ({pattern}): {message}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        message: String,
    },

    /// A `plugins` entry names no known plugin
    #[error("unknown plugin in `plugins[{index}]`: `{id}`")]
    UnknownPlugin { index: usize, id: String },
}

/// A file that could not be scanned. The build continues without it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("skipped {}: {reason}", .path.display())]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: ScanWarningKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanWarningKind {
    /// The file could not be read as UTF-8 text
    #[error("unreadable ({0})")]
    Unreadable(String),
    /// The file is larger than the scanner's size limit
    #[error("{size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    /// A directory under a glob root could not be listed
    #[error("directory walk failed ({0})")]
    Walk(String),
}

/// Errors surfaced by builds and rebuilds
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A newer change superseded this rebuild before it committed
    #[error("rebuild cancelled")]
    Cancelled,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
