//! Hint and evaluation request builders, plus verdict parsing.
//!
//! Both builders produce a system instruction for a single-shot model call.
//! Parsing is deliberately forgiving: anything off-format resolves to the
//! default that never blocks the conversation (see [`ParseFailure`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ParseFailure;
use crate::registry::{DifficultyTier, LanguagePair};

/// Maximum words a coaching hint may use.
pub const HINT_WORD_BUDGET: usize = 30;

/// Prefix the hint reply is asked to start with.
pub const HINT_PREFIX: &str = "HINT:";

/// Verdict prefix for an acceptable message.
pub const OK_PREFIX: &str = "OK:";

/// Verdict prefix for a message that needs a fix.
pub const CORRECTION_PREFIX: &str = "CORRECTION:";

/// Case-insensitive `OK:` / `CORRECTION:` prefix, capturing the remainder.
static VERDICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(ok|correction):(.*)$").expect("valid regex")
});

/// Optional case-insensitive `HINT:` prefix.
static HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*hint:").expect("valid regex"));

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct HintContext<'a> {
    pub languages: LanguagePair,
    pub tier: DifficultyTier,
    /// The character's most recent line, which the learner must answer.
    pub last_character_line: &'a str,
}

/// Instruction asking for a short coaching hint in the learner's native
/// language that nudges without handing over the answer.
pub fn build_hint_prompt(ctx: &HintContext<'_>) -> String {
    let native = ctx.languages.native.display_name();
    let learning = ctx.languages.learning.display_name();
    format!(
        "You are a supportive {learning} tutor coaching a {tier} learner. \
         The character in their conversation just said: \"{line}\"\n\n\
         Write a hint in {native} of at most {HINT_WORD_BUDGET} words that suggests \
         what the learner could talk about or which words or grammar might help. \
         Do NOT write a complete reply sentence in {learning} for them to copy.\n\n\
         Start your reply with \"{HINT_PREFIX}\" followed by the hint only.",
        tier = ctx.tier.as_str(),
        line = ctx.last_character_line.trim(),
    )
}

/// Extract the hint text, tolerating a missing `HINT:` prefix.
pub fn parse_hint(raw: &str) -> Result<String, ParseFailure> {
    let body = HINT_RE.replace(raw, "");
    let hint = body.trim();
    if hint.is_empty() {
        return Err(ParseFailure::EmptyHint);
    }
    Ok(hint.to_string())
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub languages: LanguagePair,
    pub tier: DifficultyTier,
    pub learner_text: &'a str,
}

/// Advisory grammar/vocabulary verdict for one learner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub needs_correction: bool,
    pub correction: Option<String>,
}

impl Evaluation {
    pub fn no_correction() -> Self {
        Self {
            needs_correction: false,
            correction: None,
        }
    }
}

/// Instruction asking for a fixed-format verdict on the learner's message.
pub fn build_evaluation_prompt(ctx: &EvaluationContext<'_>) -> String {
    let native = ctx.languages.native.display_name();
    let learning = ctx.languages.learning.display_name();
    format!(
        "You check the {learning} of a {tier} learner. Evaluate the grammar and \
         vocabulary of this message: \"{text}\"\n\n\
         Ignore punctuation, capitalisation and informal style that a native speaker \
         would also use. Reply in exactly one of these formats:\n\
         {OK_PREFIX} <a few words of encouragement>\n\
         {CORRECTION_PREFIX} <the corrected phrase and a one-sentence explanation in {native}>",
        tier = ctx.tier.as_str(),
        text = ctx.learner_text.trim(),
    )
}

/// Parse a verdict reply.
///
/// `OK:` yields no correction; `CORRECTION:` yields the trimmed note.
/// Anything else is a [`ParseFailure`].
pub fn parse_verdict(raw: &str) -> Result<Evaluation, ParseFailure> {
    let caps = VERDICT_RE
        .captures(raw)
        .ok_or(ParseFailure::UnrecognizedVerdict)?;

    if caps[1].eq_ignore_ascii_case("ok") {
        return Ok(Evaluation::no_correction());
    }

    let note = caps[2].trim();
    if note.is_empty() {
        return Err(ParseFailure::EmptyCorrection);
    }
    Ok(Evaluation {
        needs_correction: true,
        correction: Some(note.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
