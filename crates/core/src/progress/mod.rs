//! Learner progress: per-location stage counts, completed topics and
//! difficulty-tier advancement.
//!
//! [`record`] holds the pure data model and its mutation rules,
//! [`selection`] the topic-selection policy, [`store`] the pluggable
//! persistence seam, and [`ledger`] ties them together with the
//! fail-open load/save behaviour.

pub mod ledger;
pub mod record;
pub mod selection;
pub mod store;

pub use ledger::ProgressLedger;
pub use record::{CompletionOutcome, LocationProgress, UserProgress, STAGES_PER_LOCATION};
pub use selection::select_topic;
pub use store::{
    progress_key, FileKeyValueStore, KeyValueProgressStore, KeyValueStore, MemoryKeyValueStore,
    ProgressStore, StoreError, PROGRESS_KEY_PREFIX,
};
