use crate::reports;
use clap::Args;
use keyclimb::config::{LayoutDefinitions, ScoringArgs};
use keyclimb::error::KcResult;
use keyclimb::layout::{Layout, LayoutRules};
use keyclimb::layouts::{resolve_layout, KnownLayout};
use keyclimb::scorer::Scorer;
use strum::IntoEnumIterator;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub scoring: ScoringArgs,
    #[command(flatten)]
    pub defs: LayoutDefinitions,

    /// A known layout name or `/`-separated rows. Every known layout when omitted.
    #[arg(short, long)]
    pub layout: Option<String>,
}

pub fn run(args: ScoreArgs, scorer: &Scorer, rules: &LayoutRules) -> KcResult<()> {
    let candidates: Vec<(String, Layout)> = match &args.layout {
        Some(text) => vec![(text.clone(), resolve_layout(text, rules)?)],
        None => KnownLayout::iter()
            .map(|k| Ok((k.to_string(), k.build(rules)?)))
            .collect::<KcResult<Vec<_>>>()?,
    };

    println!("\n🔎 === LAYOUT AUDIT === 🔎");
    let mut results = Vec::with_capacity(candidates.len());
    for (name, layout) in &candidates {
        reports::print_layout_grid(name, layout);
        results.push((name.clone(), scorer.score_details(layout)?));
    }

    results.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    reports::print_scoring_report(&results, &scorer.weights);
    Ok(())
}
