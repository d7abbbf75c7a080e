use serde::{Deserialize, Serialize};

/// Layout scores are exact integer sums; higher is better.
pub type Score = i64;

/// Raw sub-metric values and the weighted total for one layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub total: Score,

    pub finger_conflict: Score,
    pub inward_roll: Score,
    pub strength: Score,
    pub hand_alternation: Score,

    // === STATISTICAL COUNTERS (raw occurrence sums) ===
    pub clean_ngrams: u64,
    pub rolled_ngrams: u64,
    pub jammed_ngrams: u64,
    pub alternating_ngrams: u64,
}
