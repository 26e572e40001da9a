use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use croprec::config::{DEFAULT_DATASET_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_TRAIN_RATIO};
use croprec::{PipelineConfig, PipelineError, recommend, run, train_full};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "croprec",
    version,
    about = "Train and evaluate a nearest-centroid crop recommender",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    train: TrainArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split, train, evaluate and write the run summary (the default)
    Train(TrainArgs),
    /// Train on the whole dataset and recommend a crop for one set of measurements
    Predict(PredictArgs),
}

#[derive(Args, Debug, Clone)]
struct TrainArgs {
    /// CSV with columns N,P,K,temperature,humidity,ph,rainfall,label
    #[arg(long, env = "CROPREC_DATASET", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Where to write the JSON run summary
    #[arg(long, env = "CROPREC_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Seed for the train/eval shuffle (random if omitted)
    #[arg(long, env = "CROPREC_SEED")]
    seed: Option<u64>,

    /// Fraction of samples used for training
    #[arg(long, env = "CROPREC_TRAIN_RATIO", default_value_t = DEFAULT_TRAIN_RATIO)]
    train_ratio: f64,
}

impl From<TrainArgs> for PipelineConfig {
    fn from(args: TrainArgs) -> Self {
        PipelineConfig {
            dataset_path: args.dataset,
            output_path: args.output,
            seed: args.seed,
            train_ratio: args.train_ratio,
        }
    }
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long, env = "CROPREC_DATASET", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Measurements in column order
    #[arg(
        required = true,
        num_args = 7,
        value_names = ["N", "P", "K", "TEMPERATURE", "HUMIDITY", "PH", "RAINFALL"],
        allow_negative_numbers = true
    )]
    measurements: Vec<f64>,
}

// `RUST_LOG` directives, falling back to `info` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(log_filter(&directives))
        .init();
}

fn execute(cli: Cli) -> Result<(), PipelineError> {
    match cli.command.unwrap_or(Command::Train(cli.train)) {
        Command::Train(args) => {
            let config = PipelineConfig::from(args);
            info!(
                dataset = %config.dataset_path.display(),
                output = %config.output_path.display(),
                "starting training run"
            );
            let result = run(&config)?;
            info!(
                accuracy = %format!("{:.2}%", result.accuracy * 100.0),
                crops = result.crops.len(),
                "run complete"
            );
        }
        Command::Predict(args) => {
            let table = train_full(&args.dataset)?;
            let crop = recommend(&table, &args.measurements)?;
            info!(crop = %crop, "recommended crop");
            println!("{}", crop);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
