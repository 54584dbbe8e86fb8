//! Character system-prompt assembly.
//!
//! [`build_prompt`] is pure: identical inputs always produce the identical
//! instruction string. The template is picked by the [`TurnState`]'s
//! [`PromptMode`].

use crate::catalog::{scenario_for_name, Character, Topic};
use crate::registry::{DifficultyTier, LanguagePair};
use crate::turn::{PromptMode, TurnState, CONTINUE_TAG, END_TAG};

/// Everything the assembler needs for one character turn.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub character: &'a Character,
    /// Location name as supplied by the caller; unknown names fall back to a
    /// generic difficulty-keyed scenario.
    pub location: &'a str,
    pub tier: DifficultyTier,
    pub topic: Option<&'a Topic>,
    pub turn: TurnState,
    pub languages: LanguagePair,
}

/// Tier-keyed style guidance for the character's replies.
pub fn style_guidelines(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Beginner => {
            "Use very short, simple sentences and common everyday words. \
             Speak slowly and clearly. Ask only one simple question at a time."
        }
        DifficultyTier::Intermediate => {
            "Use natural, everyday sentences with some variety in tense and vocabulary. \
             Keep replies to two or three sentences."
        }
        DifficultyTier::Advanced => {
            "Speak naturally as you would with a fluent adult, including idioms and \
             nuanced vocabulary. Keep replies concise but rich."
        }
    }
}

fn scenario_block(ctx: &PromptContext<'_>) -> String {
    match ctx.topic {
        Some(topic) => format!(
            "Conversation topic: {}. {}",
            topic.name, topic.description
        ),
        None => format!("Scenario: {}", scenario_for_name(ctx.location, ctx.tier)),
    }
}

fn mode_block(mode: PromptMode) -> String {
    match mode {
        PromptMode::Continue => "Keep the conversation going. Respond to what the learner \
             said, stay in character, and end your reply with a question or prompt that \
             invites them to keep talking."
            .to_string(),
        PromptMode::MayEnd => format!(
            "The conversation may now end naturally if it has reached a good stopping \
             point. Begin your reply with exactly one marker: {CONTINUE_TAG} if the \
             conversation should keep going, or {END_TAG} if it should wrap up. After \
             {CONTINUE_TAG}, respond and ask a follow-up question. After {END_TAG}, give \
             a short friendly goodbye without asking anything."
        ),
        PromptMode::MustEnd => "This is the final turn. Reply with a short, warm closing \
             statement that wraps up the conversation. Do not ask any question and do not \
             add any bracketed markers or labels."
            .to_string(),
    }
}

fn language_lock(languages: &LanguagePair) -> Option<String> {
    if languages.learning.is_default() {
        return None;
    }
    let name = languages.learning.display_name();
    Some(format!(
        "IMPORTANT: Respond ONLY in {name}. Never switch to {native} or any other \
         language, even if the learner writes in another language.",
        native = languages.native.display_name()
    ))
}

/// Compose the character system instruction for one turn.
pub fn build_prompt(ctx: &PromptContext<'_>) -> String {
    let character = ctx.character;
    let mut sections = vec![
        format!(
            "You are {}, a {} in a small town. Personality: {}.",
            character.name, character.role, character.personality
        ),
        format!(
            "You are talking with a {} learner of {}. Stay in character at all times \
             and never mention that you are an AI or a language tutor.",
            ctx.tier.as_str(),
            ctx.languages.learning.display_name()
        ),
        scenario_block(ctx),
        format!("Style: {}", style_guidelines(ctx.tier)),
        mode_block(ctx.turn.mode()),
    ];

    if let Some(lock) = language_lock(&ctx.languages) {
        sections.push(lock);
    }

    sections.join("\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{character_for, find_topic, generic_scenario, scenario, Location};
    use crate::registry::LanguageCode;

    fn ctx_with<'a>(
        character: &'a Character,
        location: &'a str,
        topic: Option<&'a Topic>,
        turn_count: u32,
        learning: LanguageCode,
    ) -> PromptContext<'a> {
        let tier = DifficultyTier::Beginner;
        PromptContext {
            character,
            location,
            tier,
            topic,
            turn: TurnState::new(turn_count, tier.turn_limits()),
            languages: LanguagePair::new(LanguageCode::En, learning),
        }
    }

    #[test]
    fn continue_mode_has_no_control_markers() {
        let character = character_for(Location::Cafe);
        let prompt = build_prompt(&ctx_with(&character, "cafe", None, 1, LanguageCode::Es));
        assert!(!prompt.contains(CONTINUE_TAG));
        assert!(!prompt.contains(END_TAG));
        assert!(prompt.contains("Marco"));
    }

    #[test]
    fn may_end_mode_includes_marker_instructions() {
        let character = character_for(Location::Cafe);
        let prompt = build_prompt(&ctx_with(&character, "cafe", None, 3, LanguageCode::Es));
        assert!(prompt.contains(CONTINUE_TAG));
        assert!(prompt.contains(END_TAG));
    }

    #[test]
    fn must_end_mode_never_contains_marker_block() {
        let character = character_for(Location::Park);
        for count in 5..10 {
            let prompt =
                build_prompt(&ctx_with(&character, "park", None, count, LanguageCode::Fr));
            assert!(!prompt.contains(CONTINUE_TAG));
            assert!(!prompt.contains(END_TAG));
            assert!(prompt.contains("final turn"));
        }
    }

    #[test]
    fn topic_overrides_scenario() {
        let character = character_for(Location::Cafe);
        let topic = find_topic(Location::Cafe, DifficultyTier::Beginner, "order_coffee").unwrap();
        let prompt =
            build_prompt(&ctx_with(&character, "cafe", Some(topic), 0, LanguageCode::Es));
        assert!(prompt.contains(topic.description));
        assert!(!prompt.contains(scenario(Location::Cafe, DifficultyTier::Beginner)));
    }

    #[test]
    fn unknown_location_uses_generic_scenario() {
        let character = character_for(Location::Cafe);
        let prompt = build_prompt(&ctx_with(&character, "moon_base", None, 0, LanguageCode::Es));
        assert!(prompt.contains(generic_scenario(DifficultyTier::Beginner)));
    }

    #[test]
    fn language_lock_only_for_non_default_language() {
        let character = character_for(Location::Library);
        let spanish = build_prompt(&ctx_with(&character, "library", None, 0, LanguageCode::Es));
        assert!(spanish.contains("Respond ONLY in Spanish"));

        let english = build_prompt(&ctx_with(&character, "library", None, 0, LanguageCode::En));
        assert!(!english.contains("Respond ONLY in"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let character = character_for(Location::Market);
        let ctx = ctx_with(&character, "market", None, 2, LanguageCode::De);
        assert_eq!(build_prompt(&ctx), build_prompt(&ctx));
    }
}
