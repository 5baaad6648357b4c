//! Languages and translation directions offered to users.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Locale used for recognition when a language has no entry in the table.
pub const FALLBACK_LOCALE: &str = "en-US";

/// A language the relay can translate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Uz,
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Uz, Language::Ru, Language::En];

    /// Two-letter code passed to translation providers.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "uz" => Some(Language::Uz),
            "ru" => Some(Language::Ru),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Spoken-language hint for the speech recognizer.
    pub fn locale(&self) -> &'static str {
        locale_for_code(self.code())
    }

    fn flag(&self) -> &'static str {
        match self {
            Language::Uz => "🇺🇿",
            Language::Ru => "🇷🇺",
            Language::En => "🇬🇧",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Maps a two-letter code to a recognizer locale; unknown codes get [`FALLBACK_LOCALE`].
pub fn locale_for_code(code: &str) -> &'static str {
    match code {
        "uz" => "uz-UZ",
        "ru" => "ru-RU",
        "en" => "en-US",
        _ => FALLBACK_LOCALE,
    }
}

/// A selected (source, target) language pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub source: Language,
    pub target: Language,
}

impl Direction {
    pub const fn new(source: Language, target: Language) -> Self {
        Self { source, target }
    }

    /// Keyboard label, e.g. `🇺🇿 UZ-RU 🇷🇺`.
    pub fn label(&self) -> String {
        format!(
            "{} {}-{} {}",
            self.source.flag(),
            self.source.code().to_uppercase(),
            self.target.code().to_uppercase(),
            self.target.flag()
        )
    }

    /// Resolves a keyboard label back to its direction.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        DIRECTIONS
            .iter()
            .zip(DIRECTION_LABELS.iter())
            .find(|(_, l)| l.as_str() == label)
            .map(|(d, _)| *d)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// The six directions offered on the selection keyboard, in display order.
pub const DIRECTIONS: [Direction; 6] = [
    Direction::new(Language::Uz, Language::Ru),
    Direction::new(Language::Ru, Language::Uz),
    Direction::new(Language::Uz, Language::En),
    Direction::new(Language::En, Language::Uz),
    Direction::new(Language::Ru, Language::En),
    Direction::new(Language::En, Language::Ru),
];

static DIRECTION_LABELS: Lazy<Vec<String>> =
    Lazy::new(|| DIRECTIONS.iter().map(Direction::label).collect());

/// Labels of [`DIRECTIONS`], in the same order.
pub fn direction_labels() -> &'static [String] {
    &DIRECTION_LABELS
}
