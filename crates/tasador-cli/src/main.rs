//! tasador - house price estimates from the command line
//!
//! Usage:
//!   tasador labels                                   # List categorical vocabularies
//!   tasador predict --area 7420 --select mainroad=yes  # One estimate
//!   tasador batch --input houses.csv --export out.csv  # One session over many forms

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tasador::config::PredictorConfig;
use tasador::registry::UnknownCategoryPolicy;
use tasador::Predictor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{batch, labels, predict};
use error::CliError;

/// tasador - House price estimation
///
/// Encodes house attributes, runs the pre-trained price model and keeps a
/// per-session history of estimates.
#[derive(Parser)]
#[command(name = "tasador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model artifact (default: $TASADOR_MODEL or housing_model.tsdr)
    #[arg(long, global = true, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Encoder artifact (default: $TASADOR_ENCODERS or label_encoders.json)
    #[arg(long, global = true, value_name = "FILE")]
    encoders: Option<PathBuf>,

    /// Unknown label policy: reject, sentinel or sentinel:<code>
    #[arg(long, global = true)]
    policy: Option<UnknownCategoryPolicy>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known labels of each categorical feature
    Labels {
        /// Only show this feature
        #[arg(long)]
        feature: Option<String>,
    },

    /// Estimate the price of one house
    Predict(predict::PredictArgs),

    /// Estimate every row of a CSV file in one session
    Batch {
        /// CSV with one column per numeric field and categorical feature
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Lowest price shown in history (default 0)
        #[arg(long)]
        min_price: Option<f64>,

        /// Highest price shown in history (default unbounded)
        #[arg(long)]
        max_price: Option<f64>,

        /// Write the filtered history as CSV
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("TASADOR_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_predictor(cli: &Cli) -> Result<Predictor, CliError> {
    let mut config = PredictorConfig::from_env()?;
    if let Some(model) = &cli.model {
        config = config.with_model_path(model);
    }
    if let Some(encoders) = &cli.encoders {
        config = config.with_encoders_path(encoders);
    }
    if let Some(policy) = cli.policy {
        config = config.with_policy(policy);
    }
    debug!(
        model = %config.model_path.display(),
        encoders = %config.encoders_path.display(),
        policy = %config.policy,
        "loading predictor"
    );
    Ok(Predictor::load(&config)?)
}

fn execute(cli: &Cli) -> Result<(), CliError> {
    let predictor = load_predictor(cli)?;

    match &cli.command {
        Commands::Labels { feature } => labels::run(&predictor, feature.as_deref()),
        Commands::Predict(args) => predict::run(&predictor, args),
        Commands::Batch {
            input,
            min_price,
            max_price,
            export,
        } => batch::run(
            Arc::new(predictor),
            input,
            *min_price,
            *max_price,
            export.as_deref(),
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
