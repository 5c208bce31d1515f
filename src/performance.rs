//! Aggregation of a finished simulation into summary metrics.

use statrs::statistics::Statistics;

use crate::models::{BacktestResult, Trade};

/// Annualization factor for daily bars.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    /// Builds the final result from the raw simulation outputs. Summary
    /// metrics, the equity curve and the final capital are rounded to
    /// two decimals; individual trades keep full precision.
    pub fn summarize(
        initial_capital: f64,
        final_capital: f64,
        equity_curve: Vec<f64>,
        trades: Vec<Trade>,
    ) -> BacktestResult {
        let total_return = (final_capital - initial_capital) / initial_capital * 100.0;
        let sharpe_ratio = Self::sharpe_ratio(&equity_curve);
        let max_drawdown = Self::max_drawdown(&equity_curve);

        let total_trades = trades.len();
        let winners = trades.iter().filter(|t| t.pnl > 0.0).count();
        let win_rate = if total_trades > 0 {
            winners as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        let profit_factor = Self::profit_factor(&trades);

        BacktestResult {
            total_return: round2(total_return),
            sharpe_ratio: round2(sharpe_ratio),
            max_drawdown: round2(max_drawdown),
            win_rate: round2(win_rate),
            total_trades,
            profit_factor: round2(profit_factor),
            equity_curve: equity_curve.into_iter().map(round2).collect(),
            trades,
            final_capital: round2(final_capital),
        }
    }

    /// Annualized Sharpe ratio of bar-to-bar equity returns, using the
    /// population standard deviation. Zero when the curve has fewer
    /// than two points or never moves.
    pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
        if equity_curve.len() < 2 {
            return 0.0;
        }
        let returns: Vec<f64> = equity_curve
            .windows(2)
            .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
            .collect();
        let std_dev = returns.clone().population_std_dev();
        if std_dev > 0.0 {
            returns.clone().mean() / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        }
    }

    /// Largest peak-to-trough decline of the equity curve, as a
    /// positive percentage.
    pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
        let mut peak = f64::MIN;
        let mut worst: f64 = 0.0;
        for &value in equity_curve {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                worst = worst.min((value - peak) / peak);
            }
        }
        worst.abs() * 100.0
    }

    /// Gross profit over gross loss. With winners but no losers the
    /// denominator falls back to 1, so the factor equals the gross
    /// profit; with no trades at all this yields zero.
    pub fn profit_factor(trades: &[Trade]) -> f64 {
        let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
        let gross_loss: f64 = trades.iter().filter(|t| t.pnl < 0.0).map(|t| t.pnl).sum();
        let denominator = if gross_loss < 0.0 { gross_loss.abs() } else { 1.0 };
        gross_profit / denominator
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
