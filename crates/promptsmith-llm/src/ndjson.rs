//! NDJSON line parser for Ollama streaming responses.
//!
//! With `stream: true` the server writes one JSON object per line:
//!
//! ```text
//! {"model":"qwen2.5:7b","response":"Hel","done":false}
//! {"model":"qwen2.5:7b","response":"lo","done":false}
//! {"model":"qwen2.5:7b","response":"","done":true,"done_reason":"stop"}
//! ```
//!
//! `/api/chat` uses the same framing but nests the fragment under
//! `message.content`. A failure mid-stream arrives as `{"error":"..."}`.
//!
//! Network chunks do not respect character boundaries, so [`LineBuffer`]
//! splits on raw `\n` bytes and only decodes complete lines.

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::types::StreamChunk;

#[derive(Debug, Deserialize)]
struct NdjsonLine {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<LineMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineMessage {
    #[serde(default)]
    content: String,
}

/// Parse a single NDJSON line into zero or more [`StreamChunk`] values.
///
/// Returns `Ok(vec![])` for blank lines and for objects carrying neither
/// text nor a `done` flag. A final line may carry both a last fragment and
/// `done: true`, producing two chunks.
///
/// # Errors
///
/// - [`ProviderError::RequestFailed`] for an in-band `{"error": ...}` line.
/// - [`ProviderError::InvalidResponse`] for a line that is not JSON.
pub fn parse_ndjson_line(line: &str) -> Result<Vec<StreamChunk>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(vec![]);
    }

    let parsed: NdjsonLine = serde_json::from_str(line)
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse NDJSON line: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(ProviderError::RequestFailed(err));
    }

    let mut chunks = Vec::new();

    let text = parsed
        .response
        .or_else(|| parsed.message.map(|m| m.content))
        .unwrap_or_default();
    if !text.is_empty() {
        chunks.push(StreamChunk::TextDelta { text });
    }

    if parsed.done {
        chunks.push(StreamChunk::Done {
            done_reason: parsed.done_reason,
        });
    }

    Ok(chunks)
}

/// Accumulates raw body bytes and yields complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every line completed by them, without the
    /// trailing newline.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&line[..pos]));
        }
        lines
    }

    /// Flush a final line that was not newline-terminated.
    pub fn finish(self) -> Option<String> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        Some(decode_line(&self.pending))
    }
}

// Only whole lines reach this; invalid UTF-8 here is a server fault.
fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
