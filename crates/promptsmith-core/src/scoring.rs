//! Structural quality heuristic for refined prompts.
//!
//! A refined prompt is judged by which of its mode's expected section
//! headers appear (in Uzbek or Russian) and whether it is long enough to
//! plausibly hold real content:
//!
//! ```text
//! score = hits / max(markers, 1) * (1.0 if trimmed chars > 600 else 0.8)
//! ```
//!
//! The cascade re-runs on a stronger model when the score falls below
//! [`QUALITY_THRESHOLD`].

use std::sync::LazyLock;

use promptsmith_types::Mode;
use regex::Regex;

/// Scores below this trigger the cascade fallback.
pub const QUALITY_THRESHOLD: f32 = 0.8;

/// Outputs must exceed this many characters (after trimming) to avoid the
/// length penalty.
pub const MIN_STRUCTURED_CHARS: usize = 600;

/// Multiplier applied to short outputs.
pub const SHORT_OUTPUT_FACTOR: f32 = 0.8;

// ── Trait ──────────────────────────────────────────────────────────────

/// Rate a refined prompt for a given mode.
pub trait QualityScorer: Send + Sync {
    /// Returns a value in `0.0..=1.0` where higher is better.
    fn score(&self, mode: Mode, text: &str) -> f32;
}

// ── Marker table ───────────────────────────────────────────────────────

/// One expected section header.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Pattern source as written in the table.
    pub name: &'static str,
    pattern: Regex,
}

impl Marker {
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn marker(pattern: &'static str) -> Marker {
    Marker {
        name: pattern,
        pattern: Regex::new(&format!("(?i){pattern}")).expect("marker patterns are valid regex"),
    }
}

/// Mode to expected section headers.
#[derive(Debug, Clone)]
pub struct MarkerTable {
    chatgpt: Vec<Marker>,
    image: Vec<Marker>,
    video: Vec<Marker>,
    coding: Vec<Marker>,
}

impl MarkerTable {
    /// The built-in table covering Uzbek and Russian header vocabulary.
    pub fn builtin() -> Self {
        Self {
            image: vec![
                marker("Maqsad"),
                marker("Kompozitsiya|Композиция"),
                marker("Mavzu|Детали"),
                marker("Uslub|Стиль"),
                marker("Kamera|Камера"),
                marker("Chiqish|Параметры"),
                marker("Nimalar|Исключить"),
                marker("Tekshirish|Уточняющий"),
            ],
            video: vec![
                marker("Maqsad|Цель"),
                marker("Syujet|Сцены"),
                marker("Kadr|Шот"),
                marker("Ovoz|Озвучка"),
                marker("Chiqish|Параметры"),
                marker("Tekshirish|Уточняющий"),
            ],
            coding: vec![
                marker("Maqsad|Цель"),
                marker("Kirish|Вход"),
                marker("Cheklov|Огранич"),
                marker("Chiqish|Формат"),
                marker("Qadam|Шаг"),
                marker("Test|Тест"),
                marker("Tekshirish|Уточняющий"),
            ],
            chatgpt: vec![
                marker("Maqsad|Цель"),
                marker("Rollar|Роли"),
                marker("Qadam|Шаг"),
                marker("Misol|Пример"),
                marker("Cheklov|Огранич"),
                marker("Tekshirish|Уточняющий"),
            ],
        }
    }

    pub fn markers(&self, mode: Mode) -> &[Marker] {
        match mode {
            Mode::Chatgpt => &self.chatgpt,
            Mode::Image => &self.image,
            Mode::Video => &self.video,
            Mode::Coding => &self.coding,
        }
    }
}

static BUILTIN: LazyLock<MarkerTable> = LazyLock::new(MarkerTable::builtin);

// ── Scoring ────────────────────────────────────────────────────────────

/// Score `text` against an arbitrary marker list.
///
/// An empty list always scores 0.
pub fn score_against(markers: &[Marker], text: &str) -> f32 {
    let hits = markers.iter().filter(|m| m.is_match(text)).count();
    let base = hits as f32 / markers.len().max(1) as f32;
    let length_factor = if text.trim().chars().count() > MIN_STRUCTURED_CHARS {
        1.0
    } else {
        SHORT_OUTPUT_FACTOR
    };
    base * length_factor
}

/// Score `text` against the built-in checklist for `mode`.
pub fn score_output(mode: Mode, text: &str) -> f32 {
    score_against(BUILTIN.markers(mode), text)
}

/// [`QualityScorer`] over the built-in marker table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerScorer;

impl QualityScorer for MarkerScorer {
    fn score(&self, mode: Mode, text: &str) -> f32 {
        score_output(mode, text)
    }
}
