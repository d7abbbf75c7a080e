use crate::error::{KcResult, KeyClimbError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in scoring profiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProfileName {
    FingerConflict,
    RollStrength,
    RollStrengthHeavy,
    RollStrengthAlternation,
}

/// Weights of each sub-metric in the total score. A zero weight disables the metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileWeights {
    pub finger_conflict: i64,
    pub inward_roll: i64,
    pub strength: i64,
    pub hand_alternation: i64,
    /// Longest n-gram folded by the n-gram metrics.
    pub max_n: usize,
}

impl Default for ProfileWeights {
    fn default() -> Self {
        Self::preset(ProfileName::RollStrengthHeavy)
    }
}

/// Shortest n-gram the hand-alternation metric looks at.
pub const ALTERNATION_MIN_LEN: usize = 4;

impl ProfileWeights {
    pub fn preset(name: ProfileName) -> Self {
        let zero = Self {
            finger_conflict: 0,
            inward_roll: 0,
            strength: 0,
            hand_alternation: 0,
            max_n: 3,
        };
        match name {
            ProfileName::FingerConflict => Self {
                finger_conflict: 1,
                ..zero
            },
            ProfileName::RollStrength => Self {
                inward_roll: 10,
                strength: 1,
                ..zero
            },
            ProfileName::RollStrengthHeavy => Self {
                inward_roll: 20,
                strength: 1,
                ..zero
            },
            ProfileName::RollStrengthAlternation => Self {
                inward_roll: 20,
                strength: 1,
                hand_alternation: 1,
                max_n: 4,
                ..zero
            },
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let content = fs::read_to_string(path)?;
        let weights: ProfileWeights = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> KcResult<()> {
        if self.uses_ngrams() && self.max_n < 2 {
            return Err(KeyClimbError::Config(format!(
                "max_n must be at least 2, got {}",
                self.max_n
            )));
        }
        if self.hand_alternation != 0 && self.max_n < ALTERNATION_MIN_LEN {
            return Err(KeyClimbError::Config(format!(
                "hand_alternation needs max_n >= {}, got {}",
                ALTERNATION_MIN_LEN, self.max_n
            )));
        }
        Ok(())
    }

    pub fn uses_ngrams(&self) -> bool {
        self.finger_conflict != 0 || self.inward_roll != 0 || self.hand_alternation != 0
    }

    /// The n-gram lengths whose tables the active metrics read.
    pub fn required_tables(&self) -> Vec<usize> {
        let mut needed = Vec::new();
        if self.strength != 0 {
            needed.push(1);
        }
        if self.finger_conflict != 0 || self.inward_roll != 0 {
            needed.extend(2..=self.max_n);
        } else if self.hand_alternation != 0 {
            needed.extend(ALTERNATION_MIN_LEN..=self.max_n);
        }
        needed
    }
}
