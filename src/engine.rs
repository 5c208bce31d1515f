//! Bar-by-bar backtest simulation.
//!
//! The engine walks the price series once, evaluating exit conditions
//! before entry conditions on every bar so that a position closed by a
//! stop or target can be replaced on the same bar. Fills happen at the
//! close of the bar that produced the signal.

use rayon::prelude::*;
use thiserror::Error;

use crate::config::{ConfigError, StrategyConfig};
use crate::models::{BacktestResult, PriceBar, PriceSeries, Trade, TradeDirection};
use crate::performance::PerformanceCalculator;
use crate::signals::SignalSeries;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("initial capital must be positive and finite, got {0}")]
    InvalidCapital(f64),
}

/// Current exposure of the simulated account. At most one position is
/// open at any time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Flat,
    Long { entry_price: f64, entry_index: usize },
    Short { entry_price: f64, entry_index: usize },
}

impl Position {
    /// Fractional return of the open position marked at `price`, or
    /// `None` when flat. Short returns are mirrored so a falling price
    /// yields a positive value.
    pub fn unrealized_return(&self, price: f64) -> Option<f64> {
        match *self {
            Position::Flat => None,
            Position::Long { entry_price, .. } => Some((price - entry_price) / entry_price),
            Position::Short { entry_price, .. } => Some((entry_price - price) / entry_price),
        }
    }
}

/// Runs the SMA-crossover / RSI strategy over `series` and returns the
/// aggregated result. The whole account compounds into every trade:
/// realized pnl is `capital * return` at the time of the exit.
pub fn run_backtest(
    series: &PriceSeries,
    config: &StrategyConfig,
    initial_capital: f64,
) -> Result<BacktestResult, EngineError> {
    config.validate()?;
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(EngineError::InvalidCapital(initial_capital));
    }

    let bars = series.bars();
    let closes = series.closes();
    let signals = SignalSeries::compute(series, config);

    let mut capital = initial_capital;
    let mut position = Position::Flat;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve = vec![capital];

    for i in config.warmup_bars()..bars.len() {
        let price = closes[i];

        if let Some(r) = position.unrealized_return(price) {
            if r <= -config.stop_loss || r >= config.take_profit {
                let trade = close_position(position, bars, i, price, capital);
                capital += trade.pnl;
                trades.push(trade);
                position = Position::Flat;
            }
        }

        if position == Position::Flat {
            let sig = signals.at(i);
            if sig.long_entry() {
                position = Position::Long {
                    entry_price: price,
                    entry_index: i,
                };
            } else if sig.short_entry() {
                position = Position::Short {
                    entry_price: price,
                    entry_index: i,
                };
            }
        }

        equity_curve.push(capital);
    }

    // A position still open after the last bar is closed at the final
    // close regardless of stop or target levels.
    if position != Position::Flat {
        let last = bars.len() - 1;
        let trade = close_position(position, bars, last, closes[last], capital);
        capital += trade.pnl;
        trades.push(trade);
    }

    Ok(PerformanceCalculator::summarize(
        initial_capital,
        capital,
        equity_curve,
        trades,
    ))
}

/// Runs the same series against several configurations in parallel,
/// preserving input order in the output.
pub fn run_backtests(
    series: &PriceSeries,
    configs: &[StrategyConfig],
    initial_capital: f64,
) -> Vec<Result<BacktestResult, EngineError>> {
    configs
        .par_iter()
        .map(|config| run_backtest(series, config, initial_capital))
        .collect()
}

fn close_position(
    position: Position,
    bars: &[PriceBar],
    exit_index: usize,
    exit_price: f64,
    capital: f64,
) -> Trade {
    let (entry_price, entry_index, direction) = match position {
        Position::Long {
            entry_price,
            entry_index,
        } => (entry_price, entry_index, TradeDirection::Long),
        Position::Short {
            entry_price,
            entry_index,
        } => (entry_price, entry_index, TradeDirection::Short),
        Position::Flat => unreachable!("close_position called while flat"),
    };
    let r = match direction {
        TradeDirection::Long => (exit_price - entry_price) / entry_price,
        TradeDirection::Short => (entry_price - exit_price) / entry_price,
    };
    Trade {
        entry_date: bars[entry_index].date,
        exit_date: bars[exit_index].date,
        entry_price,
        exit_price,
        direction,
        pnl: capital * r,
        pnl_pct: r * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000_000.0,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn long_position_tracks_return() {
        let position = Position::Long {
            entry_price: 100.0,
            entry_index: 0,
        };
        assert_eq!(position.unrealized_return(103.0), Some(0.03));
        assert_eq!(position.unrealized_return(98.0), Some(-0.02));
    }

    #[test]
    fn short_position_mirrors_return() {
        let position = Position::Short {
            entry_price: 100.0,
            entry_index: 0,
        };
        assert_eq!(position.unrealized_return(97.0), Some(0.03));
        assert_eq!(position.unrealized_return(102.0), Some(-0.02));
    }

    #[test]
    fn flat_position_has_no_return() {
        assert_eq!(Position::Flat.unrealized_return(100.0), None);
    }

    #[test]
    fn rejects_non_positive_capital() {
        let s = series(&[100.0, 101.0, 102.0]);
        let config = StrategyConfig::default();
        assert!(matches!(
            run_backtest(&s, &config, 0.0),
            Err(EngineError::InvalidCapital(_))
        ));
        assert!(matches!(
            run_backtest(&s, &config, -500.0),
            Err(EngineError::InvalidCapital(_))
        ));
        assert!(matches!(
            run_backtest(&s, &config, f64::NAN),
            Err(EngineError::InvalidCapital(_))
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let s = series(&[100.0, 101.0, 102.0]);
        let config = StrategyConfig {
            sma_short: 50,
            sma_long: 20,
            ..StrategyConfig::default()
        };
        assert!(matches!(
            run_backtest(&s, &config, 10_000.0),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn series_shorter_than_warmup_simulates_nothing() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let result = run_backtest(&series(&closes), &StrategyConfig::default(), 10_000.0).unwrap();
        assert_eq!(result.equity_curve, vec![10_000.0]);
        assert!(result.trades.is_empty());
        assert_eq!(result.final_capital, 10_000.0);
        assert_eq!(result.total_return, 0.0);
    }

    #[test]
    fn equity_curve_has_one_point_per_simulated_bar() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let config = StrategyConfig::default();
        let result = run_backtest(&series(&closes), &config, 10_000.0).unwrap();
        let simulated = closes.len() - config.warmup_bars();
        assert_eq!(result.equity_curve.len(), simulated + 1);
    }

    #[test]
    fn batch_preserves_order_and_matches_single_runs() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let s = series(&closes);
        let configs = vec![
            StrategyConfig::default(),
            StrategyConfig {
                sma_short: 5,
                sma_long: 10,
                rsi_period: 5,
                ..StrategyConfig::default()
            },
        ];
        let batch = run_backtests(&s, &configs, 10_000.0);
        assert_eq!(batch.len(), 2);
        for (config, outcome) in configs.iter().zip(&batch) {
            let single = run_backtest(&s, config, 10_000.0).unwrap();
            assert_eq!(outcome.as_ref().unwrap(), &single);
        }
    }
}
