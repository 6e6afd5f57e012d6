//! Input language detection.
//!
//! Backed by `whatlang`'s trigram classifier, restricted to the three
//! languages the templates know about. Anything the classifier is not
//! confident about is treated as Uzbek.

use promptsmith_types::Lang;
use whatlang::{Detector, Lang as Detected};

/// Classify `text` as Uzbek, Russian or English.
///
/// Empty input, input with no detectable script (digits, emoji) and
/// low-confidence detections all return [`Lang::Uz`]. Never fails.
pub fn detect_lang(text: &str) -> Lang {
    let text = text.trim();
    if text.is_empty() {
        return Lang::Uz;
    }

    let detector = Detector::with_allowlist(vec![Detected::Uzb, Detected::Rus, Detected::Eng]);
    match detector.detect(text) {
        Some(info) if info.is_reliable() => match info.lang() {
            Detected::Rus => Lang::Ru,
            Detected::Eng => Lang::En,
            _ => Lang::Uz,
        },
        _ => Lang::Uz,
    }
}
