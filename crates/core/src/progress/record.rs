//! Progress data model and mutation rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Location, ALL_LOCATIONS};
use crate::registry::DifficultyTier;
use crate::types::Timestamp;

/// Completed conversations needed to finish a location at one tier.
pub const STAGES_PER_LOCATION: u8 = 3;

/// Completion state of one location at one tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationProgress {
    /// Never decreases; capped at [`STAGES_PER_LOCATION`].
    pub completed_stages: u8,
    #[serde(default)]
    pub completed_topic_ids: Vec<String>,
    #[serde(default)]
    pub completed_at: Vec<Timestamp>,
}

impl LocationProgress {
    pub fn is_complete(&self) -> bool {
        self.completed_stages >= STAGES_PER_LOCATION
    }
}

/// Root progress record for one learning language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub current_tier: DifficultyTier,
    #[serde(default)]
    pub tiers: BTreeMap<DifficultyTier, BTreeMap<Location, LocationProgress>>,
}

/// Result of recording a finished conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub advanced: bool,
    pub new_tier: Option<DifficultyTier>,
    /// Stage count of the location after the update.
    pub completed_stages: u8,
}

impl UserProgress {
    pub fn location(&self, location: Location, tier: DifficultyTier) -> Option<&LocationProgress> {
        self.tiers.get(&tier).and_then(|locations| locations.get(&location))
    }

    fn location_mut(&mut self, location: Location, tier: DifficultyTier) -> &mut LocationProgress {
        self.tiers
            .entry(tier)
            .or_default()
            .entry(location)
            .or_default()
    }

    pub fn completed_stages(&self, location: Location, tier: DifficultyTier) -> u8 {
        self.location(location, tier)
            .map_or(0, |progress| progress.completed_stages)
    }

    pub fn completed_topics(&self, location: Location, tier: DifficultyTier) -> &[String] {
        self.location(location, tier)
            .map(|progress| progress.completed_topic_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Every location has all of its stages done at `tier`.
    pub fn is_tier_complete(&self, tier: DifficultyTier) -> bool {
        ALL_LOCATIONS
            .iter()
            .all(|&location| {
                self.location(location, tier)
                    .is_some_and(LocationProgress::is_complete)
            })
    }

    /// Count one finished conversation at `location` on the current tier.
    ///
    /// Stages stop at [`STAGES_PER_LOCATION`]; further calls leave the
    /// location untouched. When this completes the whole tier, the learner
    /// moves up one tier (no-op at the top).
    pub fn record_completion(&mut self, location: Location, now: Timestamp) -> CompletionOutcome {
        let tier = self.current_tier;
        let entry = self.location_mut(location, tier);
        if entry.completed_stages < STAGES_PER_LOCATION {
            entry.completed_stages += 1;
            entry.completed_at.push(now);
        }
        let completed_stages = entry.completed_stages;

        let new_tier = if self.is_tier_complete(tier) {
            tier.next()
        } else {
            None
        };
        if let Some(next) = new_tier {
            self.current_tier = next;
        }

        CompletionOutcome {
            advanced: new_tier.is_some(),
            new_tier,
            completed_stages,
        }
    }

    /// Add a topic to the completed set. Returns `false` if it was already there.
    pub fn mark_topic_complete(
        &mut self,
        location: Location,
        tier: DifficultyTier,
        topic_id: &str,
    ) -> bool {
        let entry = self.location_mut(location, tier);
        if entry.completed_topic_ids.iter().any(|id| id == topic_id) {
            return false;
        }
        entry.completed_topic_ids.push(topic_id.to_string());
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn complete_tier(progress: &mut UserProgress) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        for location in ALL_LOCATIONS {
            for _ in 0..STAGES_PER_LOCATION {
                outcomes.push(progress.record_completion(location, Utc::now()));
            }
        }
        outcomes
    }

    #[test]
    fn default_record_is_beginner_and_empty() {
        let progress = UserProgress::default();
        assert_eq!(progress.current_tier, DifficultyTier::Beginner);
        assert!(progress.tiers.is_empty());
    }

    #[test]
    fn stages_never_exceed_cap() {
        let mut progress = UserProgress::default();
        for _ in 0..10 {
            progress.record_completion(Location::Cafe, Utc::now());
        }
        let cafe = progress.location(Location::Cafe, DifficultyTier::Beginner).unwrap();
        assert_eq!(cafe.completed_stages, STAGES_PER_LOCATION);
        assert_eq!(cafe.completed_at.len(), STAGES_PER_LOCATION as usize);
    }

    #[test]
    fn advancement_fires_once_on_the_triggering_call() {
        let mut progress = UserProgress::default();
        let outcomes = complete_tier(&mut progress);

        let (last, earlier) = outcomes.split_last().unwrap();
        assert!(earlier.iter().all(|o| !o.advanced));
        assert!(last.advanced);
        assert_eq!(last.new_tier, Some(DifficultyTier::Intermediate));
        assert_eq!(progress.current_tier, DifficultyTier::Intermediate);

        // Further completions count toward intermediate and do not re-advance.
        let next = progress.record_completion(Location::Cafe, Utc::now());
        assert!(!next.advanced);
        assert_eq!(next.new_tier, None);
        assert_eq!(progress.completed_stages(Location::Cafe, DifficultyTier::Intermediate), 1);
    }

    #[test]
    fn top_tier_never_advances() {
        let mut progress = UserProgress {
            current_tier: DifficultyTier::Advanced,
            ..UserProgress::default()
        };
        let outcomes = complete_tier(&mut progress);
        assert!(outcomes.iter().all(|o| !o.advanced));
        assert_eq!(progress.current_tier, DifficultyTier::Advanced);
        assert!(progress.is_tier_complete(DifficultyTier::Advanced));
    }

    #[test]
    fn marking_topic_twice_is_idempotent() {
        let mut progress = UserProgress::default();
        let tier = DifficultyTier::Beginner;
        assert!(progress.mark_topic_complete(Location::Park, tier, "greetings"));
        assert!(!progress.mark_topic_complete(Location::Park, tier, "greetings"));
        assert_eq!(progress.completed_topics(Location::Park, tier).len(), 1);
    }

    #[test]
    fn topic_completion_does_not_touch_stages() {
        let mut progress = UserProgress::default();
        progress.mark_topic_complete(Location::Market, DifficultyTier::Advanced, "dinner_party");
        assert_eq!(progress.completed_stages(Location::Market, DifficultyTier::Advanced), 0);
        assert_eq!(progress.current_tier, DifficultyTier::Beginner);
    }

    #[test]
    fn record_survives_json_round_trip() {
        let mut progress = UserProgress::default();
        progress.record_completion(Location::TrainStation, Utc::now());
        progress.mark_topic_complete(Location::TrainStation, DifficultyTier::Beginner, "platform");

        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains("\"train_station\""));
        let restored: UserProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, progress);
    }
}
