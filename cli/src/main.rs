//! plinko-rtp - exact RTP verification for plinko multiplier tables
//!
//! Loads a catalog (built-in tiers, optionally overridden by a TOML file),
//! evaluates every requested row count and prints per-bucket tables, a
//! summary and critical findings.

mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plinko_catalog::{Catalog, HIGH_RISK};
use plinko_engine::{parse_decimal, Precision, ProbabilityEngine, RtpEvaluator};
use report::Evaluated;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "plinko-rtp")]
#[command(version)]
#[command(about = "Exact RTP verification for plinko multiplier tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the tables of a risk tier
    Evaluate {
        /// TOML catalog merged over the built-in tiers
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Risk tier to evaluate
        #[arg(short, long, default_value = HIGH_RISK)]
        tier: String,

        /// Row counts to evaluate (repeatable); defaults to every table of the tier
        #[arg(short, long)]
        rows: Vec<u32>,

        /// Working precision in significant digits
        #[arg(long)]
        precision: Option<u64>,

        /// Tolerance on |total probability - 1|
        #[arg(long)]
        tolerance: Option<String>,

        /// Print the summary as JSON instead of text tables
        #[arg(long)]
        json: bool,

        /// Exit non-zero on a player advantage or a probability mass anomaly
        #[arg(long)]
        strict: bool,
    },

    /// Print the built-in catalog in TOML form
    Example,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

struct EvaluateArgs {
    catalog: Option<PathBuf>,
    tier: String,
    rows: Vec<u32>,
    precision: Option<u64>,
    tolerance: Option<String>,
    json: bool,
    strict: bool,
}

fn build_evaluator(catalog: &Catalog, args: &EvaluateArgs) -> Result<RtpEvaluator> {
    let digits = args
        .precision
        .or(catalog.settings().precision)
        .unwrap_or(Precision::MINIMUM);
    let engine = ProbabilityEngine::with_digits(digits).context("Invalid working precision")?;
    let evaluator = RtpEvaluator::new(engine);

    let tolerance = match &args.tolerance {
        Some(literal) => Some(parse_decimal(literal).context("Invalid --tolerance")?),
        None => catalog.settings().tolerance()?,
    };
    match tolerance {
        Some(tolerance) => evaluator.with_tolerance(tolerance).context("Invalid tolerance"),
        None => Ok(evaluator),
    }
}

fn run_evaluate(args: EvaluateArgs) -> Result<ExitCode> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin()?,
    };
    let evaluator = build_evaluator(&catalog, &args)?;
    let tier = catalog.tier(&args.tier)?;

    let row_counts = if args.rows.is_empty() {
        tier.row_counts()
    } else {
        args.rows.clone()
    };
    let configs = row_counts
        .iter()
        .map(|&rows| tier.configuration(rows).cloned())
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        tier = tier.name(),
        configurations = configs.len(),
        precision = evaluator.engine().precision().digits(),
        tolerance = %evaluator.tolerance(),
        "Evaluating"
    );

    let results = evaluator.evaluate_batch(&configs);
    let mut evaluated = Vec::with_capacity(configs.len());
    for (config, result) in configs.into_iter().zip(results) {
        let result = result.with_context(|| format!("Failed to evaluate {} rows", config.rows()))?;
        evaluated.push(Evaluated { config, result });
    }

    if args.json {
        let rows = report::summary_rows(tier.name(), &evaluated);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let rule = "=".repeat(80);
        println!("\n{rule}");
        println!(" PLINKO {} - THEORETICAL RTP CALCULATION", report::tier_title(tier.name()));
        println!(" Using exact binomial probabilities");
        println!("{rule}");
        for e in &evaluated {
            println!("{}", report::render_configuration(tier.name(), e));
        }
        println!("{}", report::render_summary(tier.name(), &evaluated));
        println!("{}", report::render_findings(&evaluated));
    }

    let failing = evaluated
        .iter()
        .filter(|e| e.result.has_anomaly() || e.result.classification().is_player_advantage())
        .count();
    if args.strict && failing > 0 {
        warn!(failing, "Strict mode: configurations failed verification");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Evaluate {
            catalog,
            tier,
            rows,
            precision,
            tolerance,
            json,
            strict,
        } => run_evaluate(EvaluateArgs {
            catalog,
            tier,
            rows,
            precision,
            tolerance,
            json,
            strict,
        }),
        Commands::Example => {
            print!("{}", Catalog::builtin()?.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
