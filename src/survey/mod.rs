use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// The fixed poll: "what would you do with the savings?"
pub const SURVEY_OPTIONS: [&str; 6] = ["invest", "charity", "advisor", "home", "retire", "other"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySnapshot {
    pub results: BTreeMap<String, u64>,
    pub total_votes: u64,
}

/// Shared in-memory vote counters for the visitor survey.
///
/// Votes are an increment, not a document write: concurrent voters must all
/// be counted, so each vote takes the lock, adds one, and snapshots under
/// the same guard. Counts reset on restart; this is an informal poll, not a
/// durable store.
#[derive(Debug)]
pub struct SurveyStore {
    votes: Mutex<BTreeMap<&'static str, u64>>,
}

impl SurveyStore {
    pub fn new() -> Self {
        Self {
            votes: Mutex::new(SURVEY_OPTIONS.iter().map(|id| (*id, 0)).collect()),
        }
    }

    /// Atomically counts a vote and returns the resulting snapshot.
    /// Unknown option ids are rejected without touching the counters.
    pub fn record_vote(&self, option: &str) -> Result<SurveySnapshot, String> {
        let canonical = SURVEY_OPTIONS
            .iter()
            .find(|id| **id == option)
            .ok_or_else(|| format!("Unknown survey option: {option}"))?;

        let mut votes = self.lock();
        *votes.entry(canonical).or_insert(0) += 1;
        Ok(Self::snapshot_of(&votes))
    }

    /// Consistent read of all counters.
    pub fn snapshot(&self) -> SurveySnapshot {
        Self::snapshot_of(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<&'static str, u64>> {
        // A poisoned lock only means another voter panicked mid-increment;
        // the counters themselves are always valid u64s.
        self.votes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot_of(votes: &BTreeMap<&'static str, u64>) -> SurveySnapshot {
        let results: BTreeMap<String, u64> =
            votes.iter().map(|(id, n)| (id.to_string(), *n)).collect();
        let total_votes = results.values().sum();
        SurveySnapshot {
            results,
            total_votes,
        }
    }
}

impl Default for SurveyStore {
    fn default() -> Self {
        Self::new()
    }
}
