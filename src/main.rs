use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use guru_engine::commands::{backtest, generate_data};

#[derive(Parser)]
#[command(name = "guru-engine")]
#[command(about = "An SMA-crossover / RSI strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest and print the result as JSON
    Backtest {
        /// Path to a JSON file with price bars; omitted means generated demo data
        #[arg(long = "data-file", value_name = "PATH")]
        data_file: Option<PathBuf>,
        /// Strategy parameters as a JSON object, e.g. '{"smaShort": 10, "stopLoss": 0.03}'
        #[arg(long)]
        params: Option<String>,
        /// Starting account balance
        #[arg(long, default_value_t = 10_000.0)]
        initial_capital: f64,
        /// Seed for demo data generation
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of demo bars to generate
        #[arg(long, default_value_t = 365)]
        bars: usize,
        /// Include rule-based suggestions in the output
        #[arg(long)]
        suggestions: bool,
    },
    /// Generate a demo price series and write it to a JSON file
    GenerateData {
        /// Destination file
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
        /// Seed for the random walk
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of daily bars to generate
        #[arg(long, default_value_t = 365)]
        bars: usize,
        /// Price the walk starts from
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,
    },
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match command {
        Commands::Backtest {
            data_file,
            params,
            initial_capital,
            seed,
            bars,
            suggestions,
        } => backtest::run(
            data_file.as_deref(),
            params.as_deref(),
            initial_capital,
            seed,
            bars,
            suggestions,
        ),
        Commands::GenerateData {
            output,
            seed,
            bars,
            start_price,
        } => generate_data::run(&output, seed, bars, start_price),
    }
}
