//! Language and difficulty registry.
//!
//! Static lookup tables mapping locale codes to display strings and
//! difficulty tiers to their conversation-length bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

/// A supported locale. English is the default language: prompts only add a
/// language lock when the learner practises something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Es,
    Fr,
    De,
    It,
    Ja,
    Ko,
}

/// The language used when none is specified.
pub const DEFAULT_LANGUAGE: LanguageCode = LanguageCode::En;

impl LanguageCode {
    /// Every supported language, in display order.
    pub const ALL: [LanguageCode; 7] = [
        LanguageCode::En,
        LanguageCode::Es,
        LanguageCode::Fr,
        LanguageCode::De,
        LanguageCode::It,
        LanguageCode::Ja,
        LanguageCode::Ko,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
        }
    }

    /// English name, used inside prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Es => "Spanish",
            LanguageCode::Fr => "French",
            LanguageCode::De => "German",
            LanguageCode::It => "Italian",
            LanguageCode::Ja => "Japanese",
            LanguageCode::Ko => "Korean",
        }
    }

    /// Name of the language written in that language.
    pub fn native_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Es => "Español",
            LanguageCode::Fr => "Français",
            LanguageCode::De => "Deutsch",
            LanguageCode::It => "Italiano",
            LanguageCode::Ja => "日本語",
            LanguageCode::Ko => "한국어",
        }
    }

    /// BCP-47 tag handed to speech recognition as a language hint.
    pub fn speech_locale(self) -> &'static str {
        match self {
            LanguageCode::En => "en-US",
            LanguageCode::Es => "es-ES",
            LanguageCode::Fr => "fr-FR",
            LanguageCode::De => "de-DE",
            LanguageCode::It => "it-IT",
            LanguageCode::Ja => "ja-JP",
            LanguageCode::Ko => "ko-KR",
        }
    }

    pub fn is_default(self) -> bool {
        self == DEFAULT_LANGUAGE
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        DEFAULT_LANGUAGE
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        LanguageCode::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unsupported language '{s}'. Must be one of: {:?}",
                    LanguageCode::ALL.map(LanguageCode::code)
                ))
            })
    }
}

/// The learner's native language (used for hints and corrections) paired
/// with the language being practised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub native: LanguageCode,
    pub learning: LanguageCode,
}

impl LanguagePair {
    pub fn new(native: LanguageCode, learning: LanguageCode) -> Self {
        Self { native, learning }
    }
}

// ---------------------------------------------------------------------------
// Difficulty tiers
// ---------------------------------------------------------------------------

/// Ordered skill levels. Advancement only ever moves one step forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Per-tier conversation length bounds, counted in user turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnLimits {
    pub min: u32,
    pub max: u32,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    pub fn ordinal(self) -> usize {
        match self {
            DifficultyTier::Beginner => 0,
            DifficultyTier::Intermediate => 1,
            DifficultyTier::Advanced => 2,
        }
    }

    /// The tier directly above this one, or `None` at the top.
    pub fn next(self) -> Option<Self> {
        DifficultyTier::ALL.get(self.ordinal() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }

    pub fn turn_limits(self) -> TurnLimits {
        match self {
            DifficultyTier::Beginner => TurnLimits { min: 3, max: 5 },
            DifficultyTier::Intermediate => TurnLimits { min: 5, max: 8 },
            DifficultyTier::Advanced => TurnLimits { min: 7, max: 12 },
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DifficultyTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid difficulty '{s}'. Must be one of: beginner, intermediate, advanced"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_limits_are_positive_and_ordered() {
        for tier in DifficultyTier::ALL {
            let limits = tier.turn_limits();
            assert!(limits.min > 0, "{tier} min must be positive");
            assert!(limits.min <= limits.max, "{tier} min must not exceed max");
        }
    }

    #[test]
    fn tiers_are_strictly_ordered() {
        assert!(DifficultyTier::Beginner < DifficultyTier::Intermediate);
        assert!(DifficultyTier::Intermediate < DifficultyTier::Advanced);
        for (i, tier) in DifficultyTier::ALL.iter().enumerate() {
            assert_eq!(tier.ordinal(), i);
        }
    }

    #[test]
    fn next_moves_exactly_one_step() {
        assert_eq!(DifficultyTier::Beginner.next(), Some(DifficultyTier::Intermediate));
        assert_eq!(DifficultyTier::Intermediate.next(), Some(DifficultyTier::Advanced));
        assert_eq!(DifficultyTier::Advanced.next(), None);
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<DifficultyTier>().unwrap(), DifficultyTier::Advanced);
        let err = "expert".parse::<DifficultyTier>().unwrap_err();
        assert!(err.to_string().contains("Invalid difficulty"));
    }

    #[test]
    fn language_round_trips_through_code() {
        for lang in LanguageCode::ALL {
            assert_eq!(lang.code().parse::<LanguageCode>().unwrap(), lang);
        }
    }

    #[test]
    fn unknown_language_rejected() {
        let err = "xx".parse::<LanguageCode>().unwrap_err();
        assert!(err.to_string().contains("Unsupported language 'xx'"));
    }

    #[test]
    fn only_english_is_default() {
        assert!(LanguageCode::En.is_default());
        assert!(!LanguageCode::Ja.is_default());
        assert_eq!(LanguageCode::default(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&LanguageCode::Fr).unwrap();
        assert_eq!(json, "\"fr\"");
        let tier: DifficultyTier = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(tier, DifficultyTier::Intermediate);
    }
}
