//! Conversation turn state machine.
//!
//! Tracks the user turn count against the active tier's [`TurnLimits`],
//! selects the prompt mode, and interprets the leading control tag the
//! model is asked to emit once the conversation is allowed to end.

use serde::Serialize;

use crate::error::{FailOpen, ParseFailure};
use crate::registry::TurnLimits;

/// Marker the model prefixes when it wants to keep talking.
pub const CONTINUE_TAG: &str = "[CONTINUE]";
/// Marker the model prefixes when it wants to wrap up.
pub const END_TAG: &str = "[END]";

/// Substituted when the model returns nothing. Counts as a normal turn.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't quite catch that. Could you say it again?";

// ---------------------------------------------------------------------------
// Turn state
// ---------------------------------------------------------------------------

/// Which of the three mutually exclusive prompt templates applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    /// Too early to end: keep the conversation going.
    Continue,
    /// Past the minimum: the model decides via a control tag.
    MayEnd,
    /// At the maximum: the model must close the conversation.
    MustEnd,
}

/// Turn count paired with the limits of the active tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    pub turn_count: u32,
    pub limits: TurnLimits,
}

impl TurnState {
    pub fn new(turn_count: u32, limits: TurnLimits) -> Self {
        Self { turn_count, limits }
    }

    pub fn can_end(&self) -> bool {
        self.turn_count >= self.limits.min
    }

    pub fn must_end(&self) -> bool {
        self.turn_count >= self.limits.max
    }

    pub fn mode(&self) -> PromptMode {
        match (self.can_end(), self.must_end()) {
            (_, true) => PromptMode::MustEnd,
            (true, false) => PromptMode::MayEnd,
            (false, false) => PromptMode::Continue,
        }
    }
}

// ---------------------------------------------------------------------------
// Control tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlTag {
    Continue,
    End,
}

/// A model reply split into its control tag and the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedReply {
    pub kind: ControlTag,
    pub text: String,
}

/// Strip a leading `[END]` or `[CONTINUE]` marker.
///
/// Leading whitespace before the marker is tolerated. A reply without
/// either marker is a [`ParseFailure::MissingControlTag`].
pub fn parse_control_tag(raw: &str) -> Result<TaggedReply, ParseFailure> {
    let trimmed = raw.trim_start();

    let (kind, rest) = if let Some(rest) = trimmed.strip_prefix(END_TAG) {
        (ControlTag::End, rest)
    } else if let Some(rest) = trimmed.strip_prefix(CONTINUE_TAG) {
        (ControlTag::Continue, rest)
    } else {
        return Err(ParseFailure::MissingControlTag);
    };

    Ok(TaggedReply {
        kind,
        text: rest.trim().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Reply resolution
// ---------------------------------------------------------------------------

/// The character's reply after the turn state machine has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterReply {
    pub text: String,
    pub should_end: bool,
}

/// Decide what to show and whether the conversation terminates.
///
/// - Empty output becomes [`FALLBACK_REPLY`].
/// - `must_end` forces termination; markers are neither expected nor stripped.
/// - `can_end && !must_end` inspects the leading marker, defaulting to continue.
/// - Otherwise the text passes through and the conversation continues.
pub fn resolve_reply(raw: &str, state: &TurnState) -> CharacterReply {
    if raw.trim().is_empty() {
        return CharacterReply {
            text: FALLBACK_REPLY.to_string(),
            should_end: state.must_end(),
        };
    }

    match state.mode() {
        PromptMode::MustEnd => CharacterReply {
            text: raw.trim().to_string(),
            should_end: true,
        },
        PromptMode::MayEnd => {
            let tagged = parse_control_tag(raw).or_fail_open(|| TaggedReply {
                kind: ControlTag::Continue,
                text: raw.trim().to_string(),
            });
            let text = if tagged.text.is_empty() {
                FALLBACK_REPLY.to_string()
            } else {
                tagged.text
            };
            CharacterReply {
                text,
                should_end: tagged.kind == ControlTag::End,
            }
        }
        PromptMode::Continue => CharacterReply {
            text: raw.trim().to_string(),
            should_end: false,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::registry::DifficultyTier;

    fn limits() -> TurnLimits {
        TurnLimits { min: 3, max: 5 }
    }

    #[test]
    fn cannot_end_below_min() {
        for count in 0..3 {
            let state = TurnState::new(count, limits());
            assert!(!state.can_end());
            assert!(!state.must_end());
            assert_eq!(state.mode(), PromptMode::Continue);
        }
    }

    #[test]
    fn may_end_between_min_and_max() {
        let state = TurnState::new(4, limits());
        assert!(state.can_end());
        assert!(!state.must_end());
        assert_eq!(state.mode(), PromptMode::MayEnd);
    }

    #[test]
    fn must_end_implies_can_end() {
        for tier in DifficultyTier::ALL {
            for count in 0..20 {
                let state = TurnState::new(count, tier.turn_limits());
                if state.must_end() {
                    assert!(state.can_end());
                }
            }
        }
    }

    #[test]
    fn strips_leading_end_tag() {
        let tagged = parse_control_tag("[END] Goodbye!").unwrap();
        assert_eq!(tagged.kind, ControlTag::End);
        assert_eq!(tagged.text, "Goodbye!");
    }

    #[test]
    fn strips_leading_continue_tag() {
        let tagged = parse_control_tag("[CONTINUE] What else?").unwrap();
        assert_eq!(tagged.kind, ControlTag::Continue);
        assert_eq!(tagged.text, "What else?");
    }

    #[test]
    fn tag_must_lead_the_reply() {
        assert_matches!(
            parse_control_tag("Well [END] that was fun"),
            Err(ParseFailure::MissingControlTag)
        );
    }

    #[test]
    fn may_end_reply_with_end_tag_terminates() {
        let reply = resolve_reply("[END] Goodbye!", &TurnState::new(3, limits()));
        assert!(reply.should_end);
        assert_eq!(reply.text, "Goodbye!");
    }

    #[test]
    fn may_end_reply_without_tag_continues() {
        let reply = resolve_reply("How about a croissant?", &TurnState::new(4, limits()));
        assert!(!reply.should_end);
        assert_eq!(reply.text, "How about a croissant?");
    }

    #[test]
    fn must_end_forces_termination_and_keeps_text() {
        let reply = resolve_reply("[CONTINUE] See you soon!", &TurnState::new(5, limits()));
        assert!(reply.should_end);
        assert_eq!(reply.text, "[CONTINUE] See you soon!");
    }

    #[test]
    fn continue_mode_never_strips_or_ends() {
        let reply = resolve_reply("[END] Bye", &TurnState::new(1, limits()));
        assert!(!reply.should_end);
        assert_eq!(reply.text, "[END] Bye");
    }

    #[test]
    fn empty_output_uses_fallback() {
        let reply = resolve_reply("   ", &TurnState::new(1, limits()));
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(!reply.should_end);

        let reply = resolve_reply("", &TurnState::new(5, limits()));
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(reply.should_end);
    }

    #[test]
    fn bare_tag_uses_fallback_text() {
        let reply = resolve_reply("[END]", &TurnState::new(4, limits()));
        assert!(reply.should_end);
        assert_eq!(reply.text, FALLBACK_REPLY);
    }
}
