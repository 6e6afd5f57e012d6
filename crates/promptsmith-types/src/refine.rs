//! Request and result shapes for a single refinement.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

fn default_profile() -> String {
    "speed".into()
}

/// Body of `POST /refine`.
///
/// `mode` is validated strictly (unknown names are rejected during
/// deserialization). `profile` is a free string resolved leniently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementRequest {
    /// The raw user request.
    pub text: String,
    /// Target mode; defaults to `chatgpt`.
    #[serde(default)]
    pub mode: Mode,
    /// Profile name; defaults to `speed`.
    #[serde(default = "default_profile")]
    pub profile: String,
}

/// Response of `POST /refine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementResult {
    /// Echo of the request text.
    pub input: String,
    /// Echo of the mode.
    pub mode: Mode,
    /// Echo of the profile as sent.
    pub profile: String,
    /// The refined prompt.
    pub refined: String,
}
