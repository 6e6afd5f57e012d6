//! Request and response types for the Ollama HTTP API.
//!
//! Only the fields promptsmith sends or reads are modeled. Unknown response
//! fields (timings, context vectors) are ignored on deserialization.

use promptsmith_types::Turn;
use serde::{Deserialize, Serialize};

/// Sampling parameters sent as the `options` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus-sampling cutoff.
    pub top_p: f32,

    /// Context window in tokens.
    pub num_ctx: u32,

    /// Maximum number of tokens to generate. Unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl GenerationOptions {
    /// Options with no token cap.
    pub fn new(temperature: f32, top_p: f32, num_ctx: u32) -> Self {
        Self {
            temperature,
            top_p,
            num_ctx,
            num_predict: None,
        }
    }

    /// Cap the number of generated tokens.
    pub fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = Some(num_predict);
        self
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. `qwen2.5:7b`).
    pub model: String,

    /// The full prompt.
    pub prompt: String,

    /// Whether the server should stream NDJSON fragments.
    pub stream: bool,

    /// Sampling parameters.
    pub options: GenerationOptions,
}

impl GenerateRequest {
    /// Create a non-streaming request.
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options,
        }
    }
}

/// Body of the preload call: a throwaway generation that only pins the
/// model in memory for `keep_alive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreloadRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub keep_alive: String,
}

impl PreloadRequest {
    pub fn new(model: impl Into<String>, keep_alive: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: " ".into(),
            stream: false,
            keep_alive: keep_alive.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,

    /// Conversation history, oldest first.
    pub messages: Vec<Turn>,

    /// Whether the server should stream NDJSON fragments.
    pub stream: bool,

    /// Sampling parameters.
    pub options: GenerationOptions,
}

impl ChatRequest {
    /// Create a streaming chat request.
    pub fn new(model: impl Into<String>, messages: Vec<Turn>, options: GenerationOptions) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: true,
            options,
        }
    }
}

/// Non-streamed `/api/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// A single event decoded from a streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// A fragment of generated text.
    TextDelta { text: String },

    /// The server marked the stream finished.
    Done {
        /// Why generation stopped (`stop`, `length`, ...), if reported.
        done_reason: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_json_shape() {
        let mut req = GenerateRequest::new("qwen2.5:7b", "hi", GenerationOptions::new(0.3, 0.9, 2048));
        req.stream = true;
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "qwen2.5:7b");
        assert_eq!(json["prompt"], "hi");
        assert_eq!(json["stream"], true);
        assert_eq!(json["options"]["num_ctx"], 2048);
        assert!(json["options"].get("num_predict").is_none());
    }

    #[test]
    fn preload_request_uses_blank_prompt() {
        let req = PreloadRequest::new("gpt-oss:20b", "30m");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["prompt"], " ");
        assert_eq!(json["stream"], false);
        assert_eq!(json["keep_alive"], "30m");
        assert!(json.get("options").is_none());
    }

    #[test]
    fn chat_request_serializes_turns() {
        let req = ChatRequest::new(
            "gpt-oss:20b",
            vec![Turn::system("be brief"), Turn::user("salom")],
            GenerationOptions::new(0.3, 0.9, 2048).with_num_predict(512),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "salom");
        assert_eq!(json["options"]["num_predict"], 512);
    }

    #[test]
    fn generate_response_ignores_extra_fields() {
        let body = r#"{"model":"m","response":"ok","done":true,"context":[1,2,3],"total_duration":5}"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.response.as_deref(), Some("ok"));
        assert!(resp.error.is_none());
    }
}
