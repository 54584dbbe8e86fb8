//! Topic selection policy.
//!
//! Uniform-random among topics not yet completed; once every topic in the
//! bucket is done, uniform-random over the full bucket. Repeats are allowed
//! and there is no recency weighting.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::catalog::{topics, Location, Topic};
use crate::registry::DifficultyTier;

/// Pick a topic for a new conversation. `None` only if the bucket is empty.
pub fn select_topic<R: Rng + ?Sized>(
    location: Location,
    tier: DifficultyTier,
    completed: &[String],
    rng: &mut R,
) -> Option<&'static Topic> {
    let all = topics(location, tier);
    let fresh: Vec<&'static Topic> = all
        .iter()
        .filter(|topic| !completed.iter().any(|id| id == topic.id))
        .collect();

    if fresh.is_empty() {
        all.choose(rng)
    } else {
        fresh.choose(rng).copied()
    }
}
