//! Progress ledger: load-mutate-save over an injected [`ProgressStore`].
//!
//! Storage failures never reach the caller. A failed read behaves like a
//! fresh default record; a failed write leaves the mutation unsaved. Both
//! are logged at `warn`.

use std::sync::{Mutex, PoisonError};

use rand::Rng;

use crate::catalog::{Location, Topic};
use crate::progress::record::{CompletionOutcome, UserProgress};
use crate::progress::selection::select_topic;
use crate::progress::store::ProgressStore;
use crate::registry::{DifficultyTier, LanguageCode};

pub struct ProgressLedger {
    store: Box<dyn ProgressStore>,
    /// Serialises read-modify-write cycles; the ledger is the single writer.
    write_lock: Mutex<()>,
}

impl ProgressLedger {
    pub fn new(store: impl ProgressStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            write_lock: Mutex::new(()),
        }
    }

    /// Current record for `language`, or the default when absent or unreadable.
    pub fn load(&self, language: LanguageCode) -> UserProgress {
        match self.store.load(language) {
            Ok(Some(progress)) => progress,
            Ok(None) => UserProgress::default(),
            Err(e) => {
                tracing::warn!(error = %e, %language, "Progress read failed, using default record");
                UserProgress::default()
            }
        }
    }

    fn persist(&self, language: LanguageCode, progress: &UserProgress) {
        if let Err(e) = self.store.save(language, progress) {
            tracing::warn!(error = %e, %language, "Progress write failed, change not saved");
        }
    }

    fn update<T>(&self, language: LanguageCode, f: impl FnOnce(&mut UserProgress) -> T) -> T {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut progress = self.load(language);
        let result = f(&mut progress);
        self.persist(language, &progress);
        result
    }

    /// Count a finished conversation at `location` on the learner's current tier.
    pub fn record_completion(&self, language: LanguageCode, location: Location) -> CompletionOutcome {
        let outcome = self.update(language, |progress| {
            progress.record_completion(location, chrono::Utc::now())
        });

        if let Some(new_tier) = outcome.new_tier {
            tracing::info!(%language, %new_tier, "Learner advanced to next tier");
        }
        outcome
    }

    /// Add `topic_id` to the completed set. Returns `false` if already present.
    pub fn mark_topic_complete(
        &self,
        language: LanguageCode,
        location: Location,
        tier: DifficultyTier,
        topic_id: &str,
    ) -> bool {
        self.update(language, |progress| {
            progress.mark_topic_complete(location, tier, topic_id)
        })
    }

    /// Choose the topic for the next conversation at `location`.
    pub fn next_topic<R: Rng + ?Sized>(
        &self,
        language: LanguageCode,
        location: Location,
        tier: DifficultyTier,
        rng: &mut R,
    ) -> Option<&'static Topic> {
        let progress = self.load(language);
        select_topic(location, tier, progress.completed_topics(location, tier), rng)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::ALL_LOCATIONS;
    use crate::progress::record::STAGES_PER_LOCATION;
    use crate::progress::store::{
        progress_key, KeyValueProgressStore, KeyValueStore, MemoryKeyValueStore, StoreError,
    };

    fn memory_ledger() -> (ProgressLedger, Arc<MemoryKeyValueStore>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let ledger = ProgressLedger::new(KeyValueProgressStore::new(Arc::clone(&kv)));
        (ledger, kv)
    }

    /// A store whose every operation fails, as when storage is disabled.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn missing_record_loads_as_default() {
        let (ledger, _) = memory_ledger();
        assert_eq!(ledger.load(LanguageCode::Es), UserProgress::default());
    }

    #[test]
    fn completion_is_persisted() {
        let (ledger, kv) = memory_ledger();
        ledger.record_completion(LanguageCode::Es, Location::Cafe);

        assert!(kv.get(&progress_key(LanguageCode::Es)).unwrap().is_some());
        let progress = ledger.load(LanguageCode::Es);
        assert_eq!(progress.completed_stages(Location::Cafe, DifficultyTier::Beginner), 1);
    }

    #[test]
    fn languages_progress_independently() {
        let (ledger, _) = memory_ledger();
        ledger.record_completion(LanguageCode::Es, Location::Cafe);
        let french = ledger.load(LanguageCode::Fr);
        assert_eq!(french.completed_stages(Location::Cafe, DifficultyTier::Beginner), 0);
    }

    #[test]
    fn completing_every_location_advances_exactly_once() {
        let (ledger, _) = memory_ledger();
        let mut advanced = Vec::new();
        for location in ALL_LOCATIONS {
            for _ in 0..STAGES_PER_LOCATION {
                let outcome = ledger.record_completion(LanguageCode::De, location);
                if outcome.advanced {
                    advanced.push(outcome.new_tier);
                }
            }
        }
        assert_eq!(advanced, vec![Some(DifficultyTier::Intermediate)]);
        assert_eq!(ledger.load(LanguageCode::De).current_tier, DifficultyTier::Intermediate);
    }

    #[test]
    fn storage_failures_fall_back_to_defaults() {
        let ledger = ProgressLedger::new(KeyValueProgressStore::new(BrokenStore));
        let outcome = ledger.record_completion(LanguageCode::Ko, Location::Park);
        assert_eq!(outcome.completed_stages, 1);
        assert!(!outcome.advanced);
        assert_eq!(ledger.load(LanguageCode::Ko), UserProgress::default());
    }

    #[test]
    fn next_topic_skips_completed_topics() {
        let (ledger, _) = memory_ledger();
        let tier = DifficultyTier::Beginner;
        let bucket = crate::catalog::topics(Location::Library, tier);
        for topic in &bucket[1..] {
            ledger.mark_topic_complete(LanguageCode::Es, Location::Library, tier, topic.id);
        }

        let mut rng = rand::rng();
        for _ in 0..10 {
            let topic = ledger
                .next_topic(LanguageCode::Es, Location::Library, tier, &mut rng)
                .unwrap();
            assert_eq!(topic.id, bucket[0].id);
        }
    }
}
