//! Error types for strict parsing of promptsmith enums.
//!
//! Most call sites use the lenient `parse_lossy` constructors, which never
//! fail. [`TypesError`] is only produced by the [`FromStr`](std::str::FromStr)
//! implementations used at validating boundaries (HTTP bodies, CLI flags).

use thiserror::Error;

/// Errors produced when a string does not name a known enum value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Not one of `chatgpt`, `image`, `video`, `coding`.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Not one of `speed`, `balanced`, `max`.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// Not one of `system`, `user`, `assistant`.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, TypesError>;
