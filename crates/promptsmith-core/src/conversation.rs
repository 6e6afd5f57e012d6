//! Conversation history for the console shell.
//!
//! The history always starts with a single system turn. `/reset` drops
//! everything after it; `/save` writes one `{"role", "content"}` JSON object
//! per line.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use promptsmith_types::Turn;
use tracing::debug;

use crate::error::TranscriptError;

/// Ordered turns of one shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    system_prompt: String,
    turns: Vec<Turn>,
}

impl ConversationState {
    /// Start a conversation seeded with `system_prompt`.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            turns: vec![Turn::system(system_prompt.clone())],
            system_prompt,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when only the system turn remains.
    pub fn is_empty(&self) -> bool {
        self.turns.len() <= 1
    }

    /// Record a completed user/assistant exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn::user(user));
        self.turns.push(Turn::assistant(assistant));
    }

    /// History plus a pending user turn, as sent to a chat backend.
    pub fn with_pending(&self, user: &str) -> Vec<Turn> {
        let mut turns = self.turns.clone();
        turns.push(Turn::user(user));
        turns
    }

    /// Drop everything but the system turn.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.turns.push(Turn::system(self.system_prompt.clone()));
    }

    /// Write the history to `path` as JSONL, replacing any existing file.
    ///
    /// Missing parent directories are created.
    pub fn save_jsonl(&self, path: &Path) -> Result<(), TranscriptError> {
        let io_err = |source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(&serde_json::to_string(turn)?);
            out.push('\n');
        }

        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(out.as_bytes()).map_err(io_err)?;

        debug!(path = %path.display(), turns = self.turns.len(), "transcript saved");
        Ok(())
    }

    /// Read a JSONL transcript back into turns. Blank lines are skipped.
    pub fn load_jsonl(path: &Path) -> Result<Vec<Turn>, TranscriptError> {
        let contents = fs::read_to_string(path).map_err(|source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| TranscriptError::Malformed {
                    line: idx + 1,
                    source,
                })
            })
            .collect()
    }
}

/// `<logs_dir>/chat_<YYYYmmdd_HHMMSS>.jsonl` for the given moment.
pub fn transcript_path_at(logs_dir: &Path, at: DateTime<Local>) -> PathBuf {
    logs_dir.join(format!("chat_{}.jsonl", at.format("%Y%m%d_%H%M%S")))
}

/// Default `/save` target for right now.
pub fn default_transcript_path(logs_dir: &Path) -> PathBuf {
    transcript_path_at(logs_dir, Local::now())
}
