//! Theme error types

use thiserror::Error;

use crate::table::TokenPath;

/// Errors raised while merging or resolving a theme.
///
/// All of these are fatal: a build never starts scanning with a theme that
/// failed to resolve. Each variant carries the offending path so the message
/// points at the configuration entry to fix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// `extend` and `base` disagree on whether a path is a table or a value
    #[error("type conflict at `theme.{path}`: base defines a {base}, extend defines a {extend}")]
    TypeConflict {
        path: TokenPath,
        base: &'static str,
        extend: &'static str,
    },

    /// A `theme(...)` alias names a path that does not exist
    #[error("unknown reference at `theme.{path}`: `{target}` is not defined")]
    UnknownReference { path: TokenPath, target: String },

    /// `theme(...)` aliases form a cycle
    #[error("circular reference at `theme.{path}`: {chain}")]
    CircularReference { path: TokenPath, chain: String },

    /// Empty keys cannot be addressed by a class name
    #[error("invalid key at `theme.{path}`: keys must be non-empty")]
    EmptyKey { path: TokenPath },
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
