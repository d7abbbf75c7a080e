use clap::{Parser, Subcommand};
use keyclimb::config::{LayoutDefinitions, ScoringArgs};
use keyclimb::error::{KcResult, KeyClimbError};
use keyclimb::geometry::GridGeometry;
use keyclimb::scorer::loader::load_ngrams_from_path;
use keyclimb::scorer::{ProfileWeights, Scorer};
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/ngrams-all.tsv")]
    ngrams: String,

    /// Grid geometry JSON. The built-in 4x8 split grid when omitted.
    #[arg(global = true, short, long)]
    geometry: Option<String>,

    /// Profile weights JSON; explicit --weight-* flags still win.
    #[arg(global = true, long)]
    weights: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search(cmd::search::SearchArgs),
    Score(cmd::score::ScoreArgs),
}

impl Commands {
    fn scoring(&self) -> (&ScoringArgs, &LayoutDefinitions) {
        match self {
            Commands::Search(args) => (&args.config.scoring, &args.config.defs),
            Commands::Score(args) => (&args.scoring, &args.defs),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> KcResult<()> {
    info!("🚀 Initializing keyclimb...");

    let geometry = match &cli.geometry {
        Some(path) => {
            info!("📂 Loading geometry: {}", path);
            GridGeometry::load_from_file(path)?
        }
        None => GridGeometry::standard(),
    };

    let base = match &cli.weights {
        Some(path) => {
            info!("⚖️  Loading weights from: {}", path);
            Some(ProfileWeights::load_from_file(path)?)
        }
        None => None,
    };

    let (scoring, defs) = cli.command.scoring();
    let weights = scoring.resolve(base)?;
    let rules = defs.to_rules()?;

    if rules.rows() != geometry.rows || rules.cols() != geometry.cols {
        return Err(KeyClimbError::Config(format!(
            "layout grid is {}x{} but geometry describes {}x{}",
            rules.rows(),
            rules.cols(),
            geometry.rows,
            geometry.cols
        )));
    }

    let max_n = weights.required_tables().into_iter().max().unwrap_or(1);
    info!("📚 Loading n-grams up to n={} from {}", max_n, cli.ngrams);
    let store = load_ngrams_from_path(&cli.ngrams, max_n)?;
    let scorer = Scorer::new(Arc::new(store), geometry, weights)?;

    match cli.command {
        Commands::Search(args) => cmd::search::run(args, &scorer, &rules),
        Commands::Score(args) => cmd::score::run(args, &scorer, &rules),
    }
}
