use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use log::info;
use serde::Serialize;

use crate::config::StrategyConfig;
use crate::data::{generate_demo_series, JsonFileSource, PriceSource};
use crate::engine::run_backtest;
use crate::models::{BacktestResult, PriceSeries};
use crate::suggestions::{self, Suggestion};

#[derive(Serialize)]
struct Report<'a> {
    result: &'a BacktestResult,
    suggestions: Vec<Suggestion>,
}

pub fn run(
    data_file: Option<&Path>,
    params: Option<&str>,
    initial_capital: f64,
    seed: u64,
    bars: usize,
    with_suggestions: bool,
) -> Result<()> {
    let series = load_series(data_file, seed, bars)?;
    let config = parse_config(params)?;
    info!(
        "Backtesting {} bars with SMA {}/{}, RSI {} ({}/{}), stop {:.1}%, target {:.1}%",
        series.len(),
        config.sma_short,
        config.sma_long,
        config.rsi_period,
        config.rsi_oversold,
        config.rsi_overbought,
        config.stop_loss * 100.0,
        config.take_profit * 100.0
    );

    let result = run_backtest(&series, &config, initial_capital)?;
    info!(
        "{} trades, return {:.2}%, final capital {:.2}",
        result.total_trades, result.total_return, result.final_capital
    );

    let output = if with_suggestions {
        serde_json::to_string_pretty(&Report {
            result: &result,
            suggestions: suggestions::analyze(&result),
        })?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");
    Ok(())
}

fn load_series(data_file: Option<&Path>, seed: u64, bars: usize) -> Result<PriceSeries> {
    match data_file {
        Some(path) => JsonFileSource::new(path)
            .fetch()
            .with_context(|| format!("loading price data from {}", path.display())),
        None => {
            info!("No data file given, generating {bars} demo bars with seed {seed}");
            let start = Utc::now() - Duration::days(bars as i64);
            Ok(generate_demo_series(seed, bars, start, 100.0)?)
        }
    }
}

fn parse_config(params: Option<&str>) -> Result<StrategyConfig> {
    match params {
        Some(raw) => {
            let parameters: HashMap<String, f64> =
                serde_json::from_str(raw).context("parsing strategy parameters")?;
            Ok(StrategyConfig::from_parameters(&parameters)?)
        }
        None => Ok(StrategyConfig::default()),
    }
}
