//! Model family detection: single point of truth for model name classification.

use serde::{Deserialize, Serialize};

/// Coarse family a model belongs to, derived purely from its display label
/// and model identifier.
///
/// Families are a *naming* hint: pool membership is decided by quota
/// equivalence, never by family. All code that needs to know "is this a
/// Gemini model?" MUST use [`ModelFamily::from_label_and_id`] instead of
/// ad-hoc string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Google Gemini models (pro / thinking variants)
    Gemini,
    /// Google Gemini Flash models
    GeminiFlash,
    /// Anthropic Claude models
    Claude,
    /// OpenAI GPT models
    Gpt,
    /// Anything else
    Other,
}

impl ModelFamily {
    /// Determine the family from a model's label and identifier.
    ///
    /// Matching is case-insensitive substring search across both strings.
    /// "flash" is tested before "gemini" since every Flash label also
    /// mentions Gemini.
    pub fn from_label_and_id(label: &str, model_id: &str) -> Self {
        let text = format!("{} {}", label, model_id).to_lowercase();
        if text.contains("flash") {
            Self::GeminiFlash
        } else if text.contains("gemini") {
            Self::Gemini
        } else if text.contains("claude") {
            Self::Claude
        } else if text.contains("gpt") {
            Self::Gpt
        } else {
            Self::Other
        }
    }

    /// Display priority rank. Pools are ordered by the minimum rank of
    /// their members: Gemini first, then Flash, Claude, GPT, the rest.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Gemini => 0,
            Self::GeminiFlash => 1,
            Self::Claude => 2,
            Self::Gpt => 3,
            Self::Other => 4,
        }
    }

    /// Returns the family name as a string (for pool ids, log fields etc.)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::GeminiFlash => "gemini_flash",
            Self::Claude => "claude",
            Self::Gpt => "gpt",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_wins_over_gemini() {
        assert_eq!(
            ModelFamily::from_label_and_id("Gemini 3 Flash", "gemini-3-flash"),
            ModelFamily::GeminiFlash
        );
        assert_eq!(
            ModelFamily::from_label_and_id("Gemini 3 Pro (High)", "gemini-3-pro-high"),
            ModelFamily::Gemini
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            ModelFamily::from_label_and_id("CLAUDE Sonnet 4.5", ""),
            ModelFamily::Claude
        );
        assert_eq!(ModelFamily::from_label_and_id("", "GPT-OSS"), ModelFamily::Gpt);
    }

    #[test]
    fn test_id_alone_is_enough() {
        assert_eq!(
            ModelFamily::from_label_and_id("Fast Chat", "gemini-2.5-flash"),
            ModelFamily::GeminiFlash
        );
    }

    #[test]
    fn test_unknown_falls_to_other() {
        assert_eq!(ModelFamily::from_label_and_id("SWE Grep", "swe-grep"), ModelFamily::Other);
    }

    #[test]
    fn test_priority_order() {
        assert!(ModelFamily::Gemini.priority() < ModelFamily::GeminiFlash.priority());
        assert!(ModelFamily::GeminiFlash.priority() < ModelFamily::Claude.priority());
        assert!(ModelFamily::Claude.priority() < ModelFamily::Gpt.priority());
        assert!(ModelFamily::Gpt.priority() < ModelFamily::Other.priority());
    }
}
