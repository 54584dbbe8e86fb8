//! Handlers for the conversation flow: start, turn, hint and evaluation.
//!
//! The client owns the ephemeral session (history and turn count) and sends
//! it with every request. The server assembles prompts, calls the model,
//! runs the turn state machine and updates progress when a conversation
//! ends.

use std::future::Future;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use parlance_core::catalog::{self, character_for, find_topic, Character, Location, Topic};
use parlance_core::coaching::{
    build_evaluation_prompt, build_hint_prompt, parse_hint, parse_verdict, Evaluation,
    EvaluationContext, HintContext,
};
use parlance_core::error::{CoreError, FailOpen};
use parlance_core::progress::CompletionOutcome;
use parlance_core::prompt::{build_prompt, PromptContext};
use parlance_core::registry::{DifficultyTier, LanguageCode, LanguagePair, TurnLimits};
use parlance_core::session::{validate_user_message, ChatMessage, ConversationSession};
use parlance_core::turn::{resolve_reply, PromptMode, TurnState};
use parlance_llm::CompletionParams;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Language selection shared by every conversation request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LanguageSelection {
    #[serde(default)]
    pub native_language: LanguageCode,
    pub learning_language: LanguageCode,
}

impl LanguageSelection {
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(self.native_language, self.learning_language)
    }
}

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub location: Location,
    pub learning_language: LanguageCode,
    /// Defaults to the learner's current tier.
    pub tier: Option<DifficultyTier>,
    /// Explicit topic; otherwise one is picked by the selection policy.
    pub topic_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub location: Location,
    #[serde(flatten)]
    pub languages: LanguageSelection,
    pub tier: Option<DifficultyTier>,
    pub topic_id: Option<String>,
    /// History before this turn, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// User turns already taken in this conversation.
    #[serde(default)]
    pub turn_count: u32,
    /// The learner's new message.
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HintRequest {
    #[serde(flatten)]
    pub languages: LanguageSelection,
    pub tier: Option<DifficultyTier>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(flatten)]
    pub languages: LanguageSelection,
    pub tier: Option<DifficultyTier>,
    pub text: String,
}

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StartConversationResponse {
    pub location: Location,
    pub tier: DifficultyTier,
    pub character: Character,
    pub scenario: &'static str,
    pub topic: Option<Topic>,
    pub turn_limits: TurnLimits,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub reply: String,
    pub should_end: bool,
    pub turn_count: u32,
    pub mode: PromptMode,
    /// Advisory verdict on the learner's message; `None` if it timed out or failed.
    pub evaluation: Option<Evaluation>,
    /// Present when this turn ended the conversation.
    pub completion: Option<CompletionOutcome>,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hint: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Requested tier, or the learner's current tier from the ledger.
async fn resolve_tier(
    state: &AppState,
    language: LanguageCode,
    tier: Option<DifficultyTier>,
) -> AppResult<DifficultyTier> {
    match tier {
        Some(tier) => Ok(tier),
        None => {
            state
                .with_progress(move |ledger| ledger.load(language).current_tier)
                .await
        }
    }
}

fn resolve_topic(
    location: Location,
    tier: DifficultyTier,
    topic_id: Option<&str>,
) -> AppResult<Option<&'static Topic>> {
    let Some(id) = topic_id else {
        return Ok(None);
    };
    let topic = find_topic(location, tier, id).ok_or_else(|| CoreError::NotFound {
        entity: "Topic",
        key: format!("{location}/{tier}/{id}"),
    })?;
    Ok(Some(topic))
}

/// Run the advisory evaluation, giving up silently after the configured timeout.
async fn evaluate_with_timeout(
    state: &AppState,
    languages: LanguagePair,
    tier: DifficultyTier,
    learner_text: &str,
) -> Option<Evaluation> {
    let prompt = build_evaluation_prompt(&EvaluationContext {
        languages,
        tier,
        learner_text,
    });
    let messages = [ChatMessage::user(prompt)];
    let call = state.llm.complete(&messages, &CompletionParams::EVALUATION);

    match tokio::time::timeout(state.config.evaluation_timeout(), call).await {
        Ok(Ok(raw)) => Some(parse_verdict(&raw).or_fail_open(Evaluation::no_correction)),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Evaluation call failed, dropping verdict");
            None
        }
        Err(_) => {
            tracing::debug!(
                timeout_ms = state.config.evaluation_timeout_ms,
                "Evaluation timed out, dropping verdict"
            );
            None
        }
    }
}

/// Drive the character call and the evaluation together, returning as soon as
/// the character replies. A verdict that has not arrived by then is dropped.
async fn race_evaluation<C, E>(chat: C, evaluation: E) -> (C::Output, Option<Evaluation>)
where
    C: Future,
    E: Future<Output = Option<Evaluation>>,
{
    tokio::pin!(chat);
    tokio::pin!(evaluation);
    let mut verdict = None;
    let mut evaluated = false;

    loop {
        tokio::select! {
            biased;
            result = &mut evaluation, if !evaluated => {
                verdict = result;
                evaluated = true;
            }
            reply = &mut chat => {
                if !evaluated {
                    tracing::debug!("Character replied before the evaluation, dropping verdict");
                }
                return (reply, verdict);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// POST /conversation/start
// ---------------------------------------------------------------------------

/// Enter a location: resolve tier, pick a topic, describe the scene.
pub async fn start_conversation(
    State(state): State<AppState>,
    Json(body): Json<StartConversationRequest>,
) -> AppResult<Json<DataResponse<StartConversationResponse>>> {
    let language = body.learning_language;
    let location = body.location;
    let tier = resolve_tier(&state, language, body.tier).await?;

    let topic = match resolve_topic(location, tier, body.topic_id.as_deref())? {
        Some(topic) => Some(topic),
        None => {
            state
                .with_progress(move |ledger| {
                    ledger.next_topic(language, location, tier, &mut rand::rng())
                })
                .await?
        }
    };

    tracing::info!(
        %language,
        %location,
        %tier,
        topic = topic.map(|t| t.id),
        "Conversation started"
    );

    Ok(Json(DataResponse {
        data: StartConversationResponse {
            location,
            tier,
            character: character_for(location),
            scenario: catalog::scenario(location, tier),
            topic: topic.copied(),
            turn_limits: tier.turn_limits(),
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /conversation/turn
// ---------------------------------------------------------------------------

/// Submit one learner message.
///
/// The character reply and the evaluation are requested concurrently. The
/// evaluation is advisory: the reply never waits for it, and a verdict that
/// fails, times out or lands after the reply is dropped. A failed character
/// call fails the turn.
pub async fn take_turn(
    State(state): State<AppState>,
    Json(body): Json<TurnRequest>,
) -> AppResult<Json<DataResponse<TurnResponse>>> {
    let languages = body.languages.pair();
    let location = body.location;
    let tier = resolve_tier(&state, languages.learning, body.tier).await?;
    let topic = resolve_topic(location, tier, body.topic_id.as_deref())?;

    let mut session = ConversationSession::resume(body.messages, body.turn_count, body.topic_id);
    let turn_count = session.submit_user_message(&body.message)?;
    let turn = TurnState::new(turn_count, tier.turn_limits());

    let character = character_for(location);
    let system_prompt = build_prompt(&PromptContext {
        character: &character,
        location: location.as_str(),
        tier,
        topic,
        turn,
        languages,
    });
    let model_messages = session.to_model_messages(system_prompt);
    let learner_text = body.message.trim();

    let chat = state.llm.complete(&model_messages, &CompletionParams::CHAT);
    let verdict = evaluate_with_timeout(&state, languages, tier, learner_text);
    let (reply, evaluation) = race_evaluation(chat, verdict).await;
    let reply = resolve_reply(&reply?, &turn);

    let completion = if reply.should_end {
        let language = languages.learning;
        let topic_id = topic.map(|t| t.id);
        let outcome = state
            .with_progress(move |ledger| {
                let outcome = ledger.record_completion(language, location);
                if let Some(id) = topic_id {
                    ledger.mark_topic_complete(language, location, tier, id);
                }
                outcome
            })
            .await?;
        Some(outcome)
    } else {
        None
    };

    tracing::info!(
        language = %languages.learning,
        %location,
        %tier,
        turn_count,
        mode = ?turn.mode(),
        should_end = reply.should_end,
        "Conversation turn completed"
    );

    Ok(Json(DataResponse {
        data: TurnResponse {
            reply: reply.text,
            should_end: reply.should_end,
            turn_count,
            mode: turn.mode(),
            evaluation,
            completion,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /conversation/hint
// ---------------------------------------------------------------------------

/// Coaching hint for answering the character's latest line.
pub async fn request_hint(
    State(state): State<AppState>,
    Json(body): Json<HintRequest>,
) -> AppResult<Json<DataResponse<HintResponse>>> {
    let languages = body.languages.pair();
    let tier = resolve_tier(&state, languages.learning, body.tier).await?;

    let session = ConversationSession::resume(body.messages, 0, None);
    let last_character_line = session.last_assistant_text().ok_or_else(|| {
        CoreError::Validation("A hint needs at least one message from the character".to_string())
    })?;

    let prompt = build_hint_prompt(&HintContext {
        languages,
        tier,
        last_character_line,
    });
    let raw = state
        .llm
        .complete(&[ChatMessage::user(prompt)], &CompletionParams::HINT)
        .await?;

    let hint = parse_hint(&raw).map(Some).or_fail_open(|| None);

    Ok(Json(DataResponse {
        data: HintResponse { hint },
    }))
}

// ---------------------------------------------------------------------------
// POST /conversation/evaluate
// ---------------------------------------------------------------------------

/// Standalone grammar/vocabulary verdict for one learner message.
pub async fn evaluate_message(
    State(state): State<AppState>,
    Json(body): Json<EvaluateRequest>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let languages = body.languages.pair();
    let tier = resolve_tier(&state, languages.learning, body.tier).await?;
    let learner_text = validate_user_message(&body.text)?;

    let prompt = build_evaluation_prompt(&EvaluationContext {
        languages,
        tier,
        learner_text,
    });
    let raw = state
        .llm
        .complete(&[ChatMessage::user(prompt)], &CompletionParams::EVALUATION)
        .await?;

    Ok(Json(DataResponse {
        data: parse_verdict(&raw).or_fail_open(Evaluation::no_correction),
    }))
}
