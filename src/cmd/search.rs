use crate::reports::{self, ConsoleSink};
use clap::Args;
use keyclimb::config::Config;
use keyclimb::error::KcResult;
use keyclimb::layout::LayoutRules;
use keyclimb::layouts::resolve_layout;
use keyclimb::optimizer::runner::{run_searches, Start};
use keyclimb::optimizer::CancelToken;
use keyclimb::scorer::{Score, ScoreDetails, Scorer};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// A known layout name, `random`, or `/`-separated rows.
    #[arg(long, default_value = "workman")]
    pub start: String,

    /// Write the final result as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Serialize)]
struct SearchReport {
    score: Score,
    rows: Vec<String>,
    details: ScoreDetails,
    evaluations: u64,
    runs: usize,
    best_run: usize,
    cancelled: bool,
}

pub fn run(args: SearchArgs, scorer: &Scorer, rules: &LayoutRules) -> KcResult<()> {
    let params = &args.config.search;

    let start = if args.start.trim().eq_ignore_ascii_case("random") {
        Start::Random
    } else {
        let layout = resolve_layout(&args.start, rules)?;
        let score = scorer.score(&layout)?;
        reports::print_layout_grid(&format!("start ({})", score), &layout);
        Start::Fixed(layout)
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(130);
        }
        handler_token.cancel();
    })?;

    info!(
        "🔥 Searching with budgets {:?}, k in [{}, {})",
        params.budgets, params.k_min, params.k_max
    );
    let started = Instant::now();
    let summary = run_searches(scorer, rules, params, &start, &cancel, ConsoleSink::new)?;
    let best = &summary.best;

    if best.cancelled {
        warn!("🛑 Interrupted; reporting the best layout found so far");
    }
    info!(
        "🏁 Done in {:.2?}: {} evaluations across {} run(s)",
        started.elapsed(),
        summary.total_evaluations(),
        summary.outcomes.len()
    );

    println!("\nScore: {}", best.score);
    reports::print_layout_grid(&format!("best (run {})", summary.best_run), &best.layout);
    println!("{}", best.layout.to_compact());

    if let Some(path) = &args.json {
        let report = SearchReport {
            score: best.score,
            rows: best.layout.row_strings(),
            details: scorer.score_details(&best.layout)?,
            evaluations: summary.total_evaluations(),
            runs: summary.outcomes.len(),
            best_run: summary.best_run,
            cancelled: best.cancelled,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("💾 Report written to {}", path.display());
    }

    Ok(())
}
