#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A model reply that did not follow the format its prompt asked for.
///
/// These are never surfaced to the learner. Every call site resolves them to
/// the behaviour that keeps the conversation moving:
///
/// | Failure               | Default                           |
/// |-----------------------|-----------------------------------|
/// | `MissingControlTag`   | continue, reply text untouched    |
/// | `EmptyHint`           | no hint shown                     |
/// | `UnrecognizedVerdict` | no correction                     |
/// | `EmptyCorrection`     | no correction                     |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("reply has no leading [CONTINUE] or [END] tag")]
    MissingControlTag,

    #[error("hint reply is empty")]
    EmptyHint,

    #[error("evaluation reply matches neither OK: nor CORRECTION:")]
    UnrecognizedVerdict,

    #[error("CORRECTION: verdict carries no note")]
    EmptyCorrection,
}

/// Resolve a [`ParseFailure`] to its call-site default, logging the miss.
pub trait FailOpen<T> {
    fn or_fail_open(self, default: impl FnOnce() -> T) -> T;
}

impl<T> FailOpen<T> for Result<T, ParseFailure> {
    fn or_fail_open(self, default: impl FnOnce() -> T) -> T {
        match self {
            Ok(value) => value,
            Err(failure) => {
                tracing::debug!(%failure, "Model reply off-format, using default");
                default()
            }
        }
    }
}
