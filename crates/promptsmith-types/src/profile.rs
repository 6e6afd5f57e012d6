//! Speed/quality profile presets.
//!
//! A [`Profile`] names a tradeoff; [`Profile::resolve`] turns it into the
//! concrete [`ModelChoice`] sent to the backend. `speed` and `balanced` are
//! fixed pairs, `max` follows whatever the loaded [`RefinerConfig`] says.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RefinerConfig;
use crate::error::TypesError;

/// Model used by the `speed` profile.
pub const SPEED_MODEL: &str = "qwen2.5:7b";
/// Context window used by the `speed` profile.
pub const SPEED_NUM_CTX: u32 = 2048;
/// Model used by the `balanced` profile.
pub const BALANCED_MODEL: &str = "mistral:latest";
/// Context window used by the `balanced` profile.
pub const BALANCED_NUM_CTX: u32 = 4096;

/// Named latency/quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Small fast model. The default when no profile is given.
    #[default]
    Speed,
    /// Mid-sized model with a larger context.
    Balanced,
    /// The configured model and context.
    Max,
}

impl Profile {
    /// Every profile, fastest first.
    pub const ALL: [Profile; 3] = [Profile::Speed, Profile::Balanced, Profile::Max];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Speed => "speed",
            Profile::Balanced => "balanced",
            Profile::Max => "max",
        }
    }

    /// Parse a profile name, aliasing anything unknown to [`Profile::Balanced`].
    ///
    /// Note the asymmetry with [`Profile::default`]: an absent profile means
    /// `speed`, a misspelled one means `balanced`.
    pub fn parse_lossy(s: &str) -> Profile {
        s.parse().unwrap_or(Profile::Balanced)
    }

    /// Resolve to a concrete model and context size.
    pub fn resolve(&self, config: &RefinerConfig) -> ModelChoice {
        match self {
            Profile::Speed => ModelChoice::new(SPEED_MODEL, SPEED_NUM_CTX),
            Profile::Balanced => ModelChoice::new(BALANCED_MODEL, BALANCED_NUM_CTX),
            Profile::Max => ModelChoice::new(config.model.clone(), config.num_ctx),
        }
    }
}

impl FromStr for Profile {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "speed" => Ok(Profile::Speed),
            "balanced" => Ok(Profile::Balanced),
            "max" => Ok(Profile::Max),
            other => Err(TypesError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete backend model and the context window to request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelChoice {
    /// Backend model identifier (e.g. `qwen2.5:7b`).
    pub model: String,
    /// Context window in tokens.
    pub num_ctx: u32,
}

impl ModelChoice {
    /// Create a choice from a model id and context size.
    pub fn new(model: impl Into<String>, num_ctx: u32) -> Self {
        Self {
            model: model.into(),
            num_ctx,
        }
    }

    /// Replace either component with a manual override, if present.
    pub fn with_overrides(mut self, model: Option<&str>, num_ctx: Option<u32>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model.to_string();
        }
        if let Some(num_ctx) = num_ctx.filter(|n| *n > 0) {
            self.num_ctx = num_ctx;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_and_balanced_are_fixed() {
        let config = RefinerConfig::default();
        assert_eq!(
            Profile::Speed.resolve(&config),
            ModelChoice::new("qwen2.5:7b", 2048)
        );
        assert_eq!(
            Profile::Balanced.resolve(&config),
            ModelChoice::new("mistral:latest", 4096)
        );
    }

    #[test]
    fn max_follows_config() {
        let config = RefinerConfig {
            model: "llama3:70b".into(),
            num_ctx: 8192,
            ..RefinerConfig::default()
        };
        assert_eq!(
            Profile::Max.resolve(&config),
            ModelChoice::new("llama3:70b", 8192)
        );
    }

    #[test]
    fn max_defaults_to_gpt_oss() {
        let choice = Profile::Max.resolve(&RefinerConfig::default());
        assert_eq!(choice.model, "gpt-oss:20b");
        assert_eq!(choice.num_ctx, 2048);
    }

    #[test]
    fn unknown_names_alias_to_balanced() {
        for name in ["turbo", "SPEED", "fast", "maximum"] {
            assert_eq!(Profile::parse_lossy(name), Profile::Balanced, "{name:?}");
        }
        assert_eq!(Profile::parse_lossy("max"), Profile::Max);
    }

    #[test]
    fn default_is_speed() {
        assert_eq!(Profile::default(), Profile::Speed);
    }

    #[test]
    fn every_profile_resolves_to_usable_choice() {
        let config = RefinerConfig::default();
        for profile in Profile::ALL {
            let choice = profile.resolve(&config);
            assert!(!choice.model.is_empty());
            assert!(choice.num_ctx > 0);
        }
    }

    #[test]
    fn overrides_replace_components() {
        let choice = ModelChoice::new("qwen2.5:7b", 2048)
            .with_overrides(Some("phi3:mini"), None);
        assert_eq!(choice, ModelChoice::new("phi3:mini", 2048));

        let choice = ModelChoice::new("qwen2.5:7b", 2048).with_overrides(None, Some(1024));
        assert_eq!(choice, ModelChoice::new("qwen2.5:7b", 1024));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let choice = ModelChoice::new("qwen2.5:7b", 2048).with_overrides(Some("  "), Some(0));
        assert_eq!(choice, ModelChoice::new("qwen2.5:7b", 2048));
    }
}
