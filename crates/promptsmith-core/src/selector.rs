//! Profile resolution and the quality cascade.
//!
//! [`Refiner::refine`] is the one entry point every surface uses (CLI,
//! shell, HTTP). It:
//!
//! 1. resolves the profile (plus any manual overrides) to a model choice,
//! 2. composes the prompt once,
//! 3. fires a keep-warm preload and runs the primary attempt,
//! 4. with cascade on, scores the text and, below [`QUALITY_THRESHOLD`],
//!    runs exactly one fallback attempt on the configured fallback model.
//!
//! The cascade is a two-state machine: a [`Primary`](Attempt::Primary)
//! attempt may hand over to a [`Fallback`](Attempt::Fallback) attempt,
//! which always terminates.

use std::sync::Arc;

use promptsmith_llm::GenerationBackend;
use promptsmith_types::{Lang, Mode, ModelChoice, Profile, RefinerConfig};
use tracing::{debug, info};

use crate::adapter::{Adapter, FragmentSink};
use crate::error::{RefineError, Result};
use crate::scoring::{MarkerScorer, QUALITY_THRESHOLD, QualityScorer};
use crate::templates::TemplateStore;

/// Per-call knobs for [`Refiner::refine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineOptions {
    /// Speed/quality preset.
    pub profile: Profile,
    /// Score the first attempt and fall back when it looks thin.
    pub cascade: bool,
    /// Forward fragments to the sink as they arrive.
    pub stream: bool,
    /// Replace the profile's model.
    pub model_override: Option<String>,
    /// Replace the profile's context size.
    pub num_ctx_override: Option<u32>,
}

impl RefineOptions {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }
}

/// What a refinement produced and how.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementOutcome {
    /// The final refined prompt.
    pub text: String,
    /// Language detected in the raw input.
    pub lang: Lang,
    /// Model of the attempt that produced `text`.
    pub model: String,
    /// Context size of the attempt that produced `text`.
    pub num_ctx: u32,
    /// Score of the primary attempt, when cascade ran.
    pub first_score: Option<f32>,
    /// Whether the fallback attempt replaced the primary output.
    pub fell_back: bool,
}

/// Cascade state.
#[derive(Debug)]
enum Attempt {
    Primary(ModelChoice),
    Fallback(ModelChoice),
}

/// The prompt refiner. Cheap to share behind an `Arc`.
pub struct Refiner {
    config: Arc<RefinerConfig>,
    templates: Arc<TemplateStore>,
    adapter: Adapter,
    scorer: Arc<dyn QualityScorer>,
}

impl Refiner {
    pub fn new(
        config: Arc<RefinerConfig>,
        templates: Arc<TemplateStore>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            adapter: Adapter::new(backend, Arc::clone(&config)),
            config,
            templates,
            scorer: Arc::new(MarkerScorer),
        }
    }

    /// Swap the quality scorer used by the cascade.
    pub fn with_scorer(mut self, scorer: Arc<dyn QualityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Model and context size the primary attempt will use.
    pub fn resolve_choice(&self, options: &RefineOptions) -> ModelChoice {
        options
            .profile
            .resolve(&self.config)
            .with_overrides(options.model_override.as_deref(), options.num_ctx_override)
    }

    /// Model and context size of the cascade fallback.
    pub fn fallback_choice(&self) -> ModelChoice {
        ModelChoice::new(self.config.fallback_model.clone(), self.config.num_ctx)
    }

    /// Refine `raw` into a structured prompt for `mode`.
    ///
    /// # Errors
    ///
    /// [`RefineError::EmptyInput`] for blank input; backend failures are
    /// returned as [`RefineError::Backend`] without retry.
    pub async fn refine(
        &self,
        raw: &str,
        mode: Mode,
        options: &RefineOptions,
        sink: &mut dyn FragmentSink,
    ) -> Result<RefinementOutcome> {
        if raw.trim().is_empty() {
            return Err(RefineError::EmptyInput);
        }

        let choice = self.resolve_choice(options);
        let composed = self
            .templates
            .compose_prompt(raw, mode, self.config.max_bullets);

        info!(
            mode = %mode,
            profile = %options.profile,
            model = %choice.model,
            num_ctx = choice.num_ctx,
            lang = %composed.lang,
            cascade = options.cascade,
            "refining prompt"
        );

        // Fire and forget: the preload is time-boxed and its result never matters.
        let _ = self.adapter.preload_keepalive(&choice.model);

        let mut attempt = Attempt::Primary(choice);
        let mut first_score = None;

        loop {
            match attempt {
                Attempt::Primary(choice) => {
                    let text = self
                        .adapter
                        .run_once(&choice, &composed.text, options.stream, sink)
                        .await?;

                    if !options.cascade {
                        return Ok(outcome(text, composed.lang, choice, None, false));
                    }

                    let score = self.scorer.score(mode, &text);
                    debug!(model = %choice.model, score, "primary attempt scored");
                    if score >= QUALITY_THRESHOLD {
                        return Ok(outcome(text, composed.lang, choice, Some(score), false));
                    }

                    first_score = Some(score);
                    let fallback = self.fallback_choice();
                    info!(
                        score,
                        from = %choice.model,
                        to = %fallback.model,
                        "quality below threshold, falling back"
                    );
                    sink.fallback(&fallback);
                    attempt = Attempt::Fallback(fallback);
                }
                Attempt::Fallback(choice) => {
                    let text = self
                        .adapter
                        .run_once(&choice, &composed.text, options.stream, sink)
                        .await?;
                    return Ok(outcome(text, composed.lang, choice, first_score, true));
                }
            }
        }
    }
}

fn outcome(
    text: String,
    lang: Lang,
    choice: ModelChoice,
    first_score: Option<f32>,
    fell_back: bool,
) -> RefinementOutcome {
    RefinementOutcome {
        text,
        lang,
        model: choice.model,
        num_ctx: choice.num_ctx,
        first_score,
        fell_back,
    }
}

impl std::fmt::Debug for Refiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refiner")
            .field("model", &self.config.model)
            .field("fallback_model", &self.config.fallback_model)
            .field("adapter", &self.adapter)
            .finish()
    }
}
