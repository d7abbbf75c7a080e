use crate::error::{KcResult, KeyClimbError};
use crate::layout::LayoutRules;
use crate::scorer::{ProfileName, ProfileWeights};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub scoring: ScoringArgs,
    #[command(flatten)]
    pub defs: LayoutDefinitions,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Patience per level, outermost first.
    #[arg(long, value_delimiter = ',', default_values_t = [100, 20, 10])]
    pub budgets: Vec<usize>,
    #[arg(long, default_value_t = 2)]
    pub k_min: usize,
    /// Exclusive upper bound on the number of cells permuted per mutation.
    #[arg(long, default_value_t = 8)]
    pub k_max: usize,
    #[arg(long, default_value_t = 100)]
    pub local_retries: usize,
    #[arg(long, default_value_t = 64)]
    pub max_draws: usize,
    #[arg(long, default_value_t = 10_000)]
    pub max_invalid_proposals: usize,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    /// Independent searches to run in parallel.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            budgets: vec![100, 20, 10],
            k_min: 2,
            k_max: 8,
            local_retries: 100,
            max_draws: 64,
            max_invalid_proposals: 10_000,
            seed: None,
            runs: 1,
        }
    }
}

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringArgs {
    /// Named weight preset (default: roll-strength-heavy). Ignored when a
    /// `--weights` file is given; the per-weight flags still apply.
    #[arg(long)]
    pub profile: Option<ProfileName>,

    #[arg(long)]
    pub weight_finger_conflict: Option<i64>,
    #[arg(long)]
    pub weight_inward_roll: Option<i64>,
    #[arg(long)]
    pub weight_strength: Option<i64>,
    #[arg(long)]
    pub weight_hand_alternation: Option<i64>,
    #[arg(long)]
    pub max_n: Option<usize>,
}

impl ScoringArgs {
    /// Starts from `base` (a weights file) or the named profile, then applies
    /// every explicitly given override.
    pub fn resolve(&self, base: Option<ProfileWeights>) -> KcResult<ProfileWeights> {
        let mut weights = match (base, self.profile) {
            (Some(file), Some(name)) => {
                warn!("Weights file takes precedence; ignoring --profile {}", name);
                file
            }
            (Some(file), None) => file,
            (None, name) => {
                ProfileWeights::preset(name.unwrap_or(ProfileName::RollStrengthHeavy))
            }
        };

        macro_rules! override_if_set {
            ($arg:ident => $field:ident) => {
                if let Some(v) = self.$arg {
                    weights.$field = v;
                }
            };
        }

        override_if_set!(weight_finger_conflict => finger_conflict);
        override_if_set!(weight_inward_roll => inward_roll);
        override_if_set!(weight_strength => strength);
        override_if_set!(weight_hand_alternation => hand_alternation);
        override_if_set!(max_n => max_n);

        weights.validate()?;
        Ok(weights)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDefinitions {
    #[arg(long, default_value_t = 4)]
    pub grid_rows: usize,
    #[arg(long, default_value_t = 8)]
    pub grid_cols: usize,
    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ'")]
    pub alphabet: String,
    #[arg(long, default_value_t = '-')]
    pub blank: char,
    /// Rare symbols confined to `pinned_rows`.
    #[arg(long, default_value = "QXZ")]
    pub pinned: String,
    #[arg(long, value_delimiter = ',', default_values_t = [0])]
    pub pinned_rows: Vec<usize>,
}

impl Default for LayoutDefinitions {
    fn default() -> Self {
        Self {
            grid_rows: 4,
            grid_cols: 8,
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ'".to_string(),
            blank: '-',
            pinned: "QXZ".to_string(),
            pinned_rows: vec![0],
        }
    }
}

impl LayoutDefinitions {
    pub fn to_rules(&self) -> KcResult<LayoutRules> {
        if !self.blank.is_ascii() || !self.alphabet.is_ascii() || !self.pinned.is_ascii() {
            return Err(KeyClimbError::Config(
                "alphabet, blank and pinned symbols must be ASCII".into(),
            ));
        }
        LayoutRules::new(
            self.grid_rows,
            self.grid_cols,
            self.alphabet.as_bytes(),
            self.blank as u8,
        )?
        .with_pin(self.pinned.as_bytes(), &self.pinned_rows)
    }
}
