//! Target modes and input languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// The kind of downstream system a refined prompt is written for.
///
/// Selects both the instruction template and the quality checklist.
/// The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// General chat assistants.
    #[default]
    Chatgpt,
    /// Text-to-image generators.
    Image,
    /// Text-to-video generators.
    Video,
    /// Coding assistants.
    Coding,
}

impl Mode {
    /// Every mode, in the order shown by help text.
    pub const ALL: [Mode; 4] = [Mode::Coding, Mode::Image, Mode::Video, Mode::Chatgpt];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Chatgpt => "chatgpt",
            Mode::Image => "image",
            Mode::Video => "video",
            Mode::Coding => "coding",
        }
    }

    /// Parse a mode name, aliasing anything unknown to [`Mode::Chatgpt`].
    pub fn parse_lossy(s: &str) -> Mode {
        s.parse().unwrap_or_default()
    }

    /// Names of all modes, for CLI value lists.
    pub fn names() -> [&'static str; 4] {
        Self::ALL.map(|m| m.as_str())
    }
}

impl FromStr for Mode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "chatgpt" => Ok(Mode::Chatgpt),
            "image" => Ok(Mode::Image),
            "video" => Ok(Mode::Video),
            "coding" => Ok(Mode::Coding),
            other => Err(TypesError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the user's raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Uzbek. Also the fallback when detection fails.
    #[default]
    Uz,
    /// Russian.
    Ru,
    /// English.
    En,
}

impl Lang {
    /// ISO 639-1 code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Uz => "uz",
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
