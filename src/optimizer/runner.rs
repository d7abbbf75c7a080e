use super::{CancelToken, HillClimber, MutationOperator, ProgressSink, SearchOutcome};
use crate::config::SearchParams;
use crate::error::KcResult;
use crate::layout::{Layout, LayoutRules};
use crate::scorer::Scorer;
use rayon::prelude::*;
use tracing::info;

/// Where each run starts from.
#[derive(Debug, Clone)]
pub enum Start {
    Fixed(Layout),
    /// A fresh random arrangement per run.
    Random,
}

pub struct RunSummary {
    pub best: SearchOutcome,
    /// Index of the run that produced `best`.
    pub best_run: usize,
    pub outcomes: Vec<SearchOutcome>,
}

impl RunSummary {
    pub fn total_evaluations(&self) -> u64 {
        self.outcomes.iter().map(|o| o.evaluations).sum()
    }
}

/// Runs `params.runs` independent searches on the rayon pool.
///
/// Run `i` is seeded with `seed + i`. The highest score wins; ties go to the
/// lowest run index.
pub fn run_searches<S, F>(
    scorer: &Scorer,
    rules: &LayoutRules,
    params: &SearchParams,
    start: &Start,
    cancel: &CancelToken,
    make_sink: F,
) -> KcResult<RunSummary>
where
    S: ProgressSink,
    F: Fn(usize) -> S + Sync,
{
    let mutation = MutationOperator::from_params(params, rules.rows(), rules.cols())?;
    let runs = params.runs.max(1);
    info!("Launching {} independent search run(s)", runs);

    let outcomes: Vec<SearchOutcome> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let mut rng = match params.seed {
                Some(s) => fastrand::Rng::with_seed(s.wrapping_add(i as u64)),
                None => fastrand::Rng::new(),
            };
            let layout = match start {
                Start::Fixed(layout) => layout.clone(),
                Start::Random => rules.random(&mut rng),
            };
            let sink = make_sink(i);
            HillClimber::new(scorer, rules, &mutation, &params.budgets)?
                .with_max_invalid_proposals(params.max_invalid_proposals)
                .with_sink(&sink)
                .run(layout, &mut rng, cancel)
        })
        .collect::<KcResult<Vec<_>>>()?;

    let mut best_run = 0;
    for (i, o) in outcomes.iter().enumerate().skip(1) {
        if o.score > outcomes[best_run].score {
            best_run = i;
        }
    }

    Ok(RunSummary {
        best: outcomes[best_run].clone(),
        best_run,
        outcomes,
    })
}
