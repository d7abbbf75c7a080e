pub mod mutation;
pub mod runner;
pub mod search;

pub use self::mutation::MutationOperator;
pub use self::search::{HillClimber, LevelState, SearchOutcome};

use crate::error::KcResult;
use crate::layout::Layout;
use crate::scorer::Score;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything that can score a layout. Higher is better.
pub trait Evaluate {
    fn evaluate(&self, layout: &Layout) -> KcResult<Score>;
}

impl<F> Evaluate for F
where
    F: Fn(&Layout) -> KcResult<Score>,
{
    fn evaluate(&self, layout: &Layout) -> KcResult<Score> {
        self(layout)
    }
}

/// Cooperative stop flag, checked between evaluation cycles.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The level's best pair was replaced by a better neighbour.
    Improved,
    /// An inner level ran out of patience and control returned to `level`.
    Reset,
}

/// Payload handed to a [`ProgressSink`].
#[derive(Debug, Clone, Copy)]
pub struct SearchEvent<'a> {
    pub kind: EventKind,
    pub level: usize,
    pub score: Score,
    pub layout: &'a Layout,
    pub evaluations: u64,
    pub failures: usize,
}

/// Observer for search progress. `()` ignores every event.
pub trait ProgressSink {
    fn on_event(&self, event: &SearchEvent<'_>);
}

impl ProgressSink for () {
    fn on_event(&self, _event: &SearchEvent<'_>) {}
}
