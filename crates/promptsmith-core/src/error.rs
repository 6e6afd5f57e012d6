//! Error types for promptsmith-core.

use std::path::PathBuf;

use promptsmith_llm::ProviderError;
use thiserror::Error;

/// Failure to load the template store. Always fatal at startup.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `modes.yaml` is not a mapping of mode name to `{sections: [...]}`.
    #[error("malformed modes file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `modes.yaml` has no `chatgpt` entry, or it lists no sections.
    #[error("modes file must define a non-empty 'chatgpt' entry")]
    MissingChatgpt,
}

/// Errors from a refinement run.
#[derive(Error, Debug)]
pub enum RefineError {
    /// The request text was empty or whitespace.
    #[error("input text is empty")]
    EmptyInput,

    /// The generation backend failed. Passed through unmodified.
    #[error(transparent)]
    Backend(#[from] ProviderError),
}

/// Errors reading or writing a shell transcript.
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// File system failure.
    #[error("transcript I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line in a JSONL transcript is not a `{role, content}` object.
    #[error("malformed transcript line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A turn could not be serialized.
    #[error("failed to encode turn: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Convenience alias for refinement results.
pub type Result<T> = std::result::Result<T, RefineError>;
