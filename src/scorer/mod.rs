pub mod engine;
pub mod loader;
pub mod metrics;
pub mod profile;
pub mod types;

pub use self::loader::FrequencyStore;
pub use self::profile::{ProfileName, ProfileWeights};
pub use self::types::{Score, ScoreDetails};

use crate::error::{KcResult, KeyClimbError};
use crate::geometry::GridGeometry;
use crate::layout::Layout;
use crate::optimizer::Evaluate;
use std::sync::Arc;
use tracing::debug;

/// A cost model bound to one corpus: geometry, profile weights and the shared tables.
#[derive(Clone)]
pub struct Scorer {
    pub geometry: GridGeometry,
    pub weights: ProfileWeights,
    store: Arc<FrequencyStore>,
}

impl Scorer {
    /// Fails up front when the profile needs a table the store lacks.
    pub fn new(
        store: Arc<FrequencyStore>,
        geometry: GridGeometry,
        weights: ProfileWeights,
    ) -> KcResult<Self> {
        geometry.validate()?;
        weights.validate()?;

        for n in weights.required_tables() {
            let table = store.table(n)?;
            debug!("{}-gram table: {} entries", n, table.len());
        }

        if !weights.uses_ngrams() && weights.strength == 0 {
            return Err(KeyClimbError::Config(
                "every metric weight is zero; nothing to optimize".into(),
            ));
        }

        Ok(Self {
            geometry,
            weights,
            store,
        })
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    pub fn score(&self, layout: &Layout) -> KcResult<Score> {
        engine::score(&self.store, &self.geometry, &self.weights, layout)
    }

    pub fn score_details(&self, layout: &Layout) -> KcResult<ScoreDetails> {
        engine::score_details(&self.store, &self.geometry, &self.weights, layout)
    }
}

impl Evaluate for Scorer {
    fn evaluate(&self, layout: &Layout) -> KcResult<Score> {
        self.score(layout)
    }
}
