use super::{CancelToken, Evaluate, EventKind, MutationOperator, ProgressSink, SearchEvent};
use crate::error::{KcResult, KeyClimbError};
use crate::layout::{Layout, LayoutRules};
use crate::scorer::Score;
use fastrand::Rng;
use tracing::{debug, info};

/// Per-level search record.
#[derive(Debug, Clone)]
pub struct LevelState {
    pub best_score: Score,
    pub best_layout: Layout,
    /// Non-improving attempts since the level was last reset.
    pub attempts: usize,
    /// Consecutive failures since the last improvement. Diagnostics only.
    pub failures: usize,
    /// False while the pair is still the seed inherited from the outer level.
    pub discovered: bool,
}

impl LevelState {
    fn seeded(best_score: Score, best_layout: Layout, discovered: bool) -> Self {
        Self {
            best_score,
            best_layout,
            attempts: 0,
            failures: 0,
            discovered,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Neighbour evaluations performed, wasted identity proposals included.
    pub evaluations: u64,
    pub score: Score,
    pub layout: Layout,
    pub cancelled: bool,
}

/// Layered stochastic hill climb.
///
/// Level 0 is the most patient; the deepest level does all the evaluating.
/// When a level exhausts its budget, control climbs to its parent, which
/// counts that as one attempt of its own and adopts the inner best pair if it
/// is strictly better.
pub struct HillClimber<'a, E, S = ()> {
    evaluator: &'a E,
    rules: &'a LayoutRules,
    mutation: &'a MutationOperator,
    budgets: Vec<usize>,
    max_invalid_proposals: usize,
    sink: &'a S,
}

impl<'a, E: Evaluate> HillClimber<'a, E, ()> {
    pub fn new(
        evaluator: &'a E,
        rules: &'a LayoutRules,
        mutation: &'a MutationOperator,
        budgets: &[usize],
    ) -> KcResult<Self> {
        if budgets.is_empty() {
            return Err(KeyClimbError::Config("at least one search level is required".into()));
        }
        if budgets.contains(&0) {
            return Err(KeyClimbError::Config(format!(
                "every level budget must be positive, got {:?}",
                budgets
            )));
        }
        Ok(Self {
            evaluator,
            rules,
            mutation,
            budgets: budgets.to_vec(),
            max_invalid_proposals: 10_000,
            sink: &(),
        })
    }
}

impl<'a, E: Evaluate, S: ProgressSink> HillClimber<'a, E, S> {
    pub fn with_sink<T: ProgressSink>(self, sink: &'a T) -> HillClimber<'a, E, T> {
        HillClimber {
            evaluator: self.evaluator,
            rules: self.rules,
            mutation: self.mutation,
            budgets: self.budgets,
            max_invalid_proposals: self.max_invalid_proposals,
            sink,
        }
    }

    /// Caps how many rule-breaking proposals in a row are resampled.
    pub fn with_max_invalid_proposals(mut self, limit: usize) -> Self {
        self.max_invalid_proposals = limit.max(1);
        self
    }

    pub fn budgets(&self) -> &[usize] {
        &self.budgets
    }

    pub fn run(&self, start: Layout, rng: &mut Rng, cancel: &CancelToken) -> KcResult<SearchOutcome> {
        self.rules.check(&start)?;
        let start_score = self.evaluator.evaluate(&start)?;
        info!("Starting score: {}", start_score);

        let deepest = self.budgets.len() - 1;
        let mut levels: Vec<LevelState> = (0..self.budgets.len())
            .map(|_| LevelState::seeded(start_score, start.clone(), false))
            .collect();
        levels[0].discovered = true;

        let mut level = 0;
        let mut evaluations: u64 = 0;

        loop {
            while level < deepest {
                let anchor = levels[level].best_layout.clone();
                level += 1;
                levels[level] = LevelState::seeded(0, anchor, false);
            }

            while levels[level].attempts < self.budgets[level] {
                if cancel.is_cancelled() {
                    return Ok(self.finish_cancelled(&levels, evaluations));
                }

                let candidate = self.neighbour(&levels[level].best_layout, rng)?;
                evaluations += 1;

                let improved = match candidate {
                    Some(layout) => {
                        let score = self.evaluator.evaluate(&layout)?;
                        let state = &mut levels[level];
                        if score > state.best_score {
                            state.best_score = score;
                            state.best_layout = layout;
                            state.discovered = true;
                            true
                        } else {
                            false
                        }
                    }
                    None => false,
                };

                let state = &mut levels[level];
                if improved {
                    debug!(
                        "Level {} improved to {} after {} failures",
                        level, state.best_score, state.failures
                    );
                    self.emit(EventKind::Improved, level, state, evaluations);
                    state.failures = 0;
                } else {
                    state.attempts += 1;
                    state.failures += 1;
                }
            }

            // Escalate until some level still has patience left.
            loop {
                levels[level].attempts = 0;
                if level == 0 {
                    info!("Search finished after {} evaluations", evaluations);
                    return Ok(SearchOutcome {
                        evaluations,
                        score: levels[0].best_score,
                        layout: levels[0].best_layout.clone(),
                        cancelled: false,
                    });
                }

                let (outer, inner) = levels.split_at_mut(level);
                let child = &inner[0];
                let parent = &mut outer[level - 1];
                parent.attempts += 1;

                if child.discovered && child.best_score > parent.best_score {
                    parent.best_score = child.best_score;
                    parent.best_layout = child.best_layout.clone();
                    parent.discovered = true;
                    parent.failures = 0;
                    if level - 1 == 0 {
                        info!("New best: {}", parent.best_score);
                    }
                } else {
                    parent.failures += 1;
                }

                level -= 1;
                debug!(
                    "Level {} reset ({}/{} attempts)",
                    level, levels[level].attempts, self.budgets[level]
                );
                self.emit(EventKind::Reset, level, &levels[level], evaluations);

                if levels[level].attempts < self.budgets[level] {
                    break;
                }
            }
        }
    }

    /// Draws a neighbour that satisfies the layout rules.
    /// `None` means the proposal came back unchanged.
    fn neighbour(&self, base: &Layout, rng: &mut Rng) -> KcResult<Option<Layout>> {
        for _ in 0..self.max_invalid_proposals {
            let candidate = self.mutation.propose(base, rng)?;
            if self.rules.is_valid(&candidate) {
                return Ok(if &candidate == base {
                    None
                } else {
                    Some(candidate)
                });
            }
        }
        Err(KeyClimbError::ExhaustedRetries {
            attempts: self.max_invalid_proposals,
            reason: "every proposal broke the layout rules".into(),
        })
    }

    fn emit(&self, kind: EventKind, level: usize, state: &LevelState, evaluations: u64) {
        self.sink.on_event(&SearchEvent {
            kind,
            level,
            score: state.best_score,
            layout: &state.best_layout,
            evaluations,
            failures: state.failures,
        });
    }

    /// Best discovered pair across all levels; ties keep the outermost.
    fn finish_cancelled(&self, levels: &[LevelState], evaluations: u64) -> SearchOutcome {
        let mut best = &levels[0];
        for state in levels.iter().skip(1).filter(|s| s.discovered) {
            if state.best_score > best.best_score {
                best = state;
            }
        }
        info!("Search cancelled after {} evaluations", evaluations);
        SearchOutcome {
            evaluations,
            score: best.best_score,
            layout: best.best_layout.clone(),
            cancelled: true,
        }
    }
}
