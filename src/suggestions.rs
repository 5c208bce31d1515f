//! Rule-based review of a backtest result.
//!
//! Each rule compares one summary metric against a fixed threshold and
//! emits human-readable advice. The rules are independent, so a single
//! result can collect several suggestions at once.

use serde::{Deserialize, Serialize};

use crate::models::BacktestResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

impl Suggestion {
    fn new(
        kind: &str,
        priority: Priority,
        title: &str,
        description: String,
        recommendation: &str,
    ) -> Self {
        Suggestion {
            kind: kind.to_string(),
            priority,
            title: title.to_string(),
            description,
            recommendation: recommendation.to_string(),
        }
    }
}

/// Evaluates every rule against `result` and returns the triggered
/// suggestions in rule order.
pub fn analyze(result: &BacktestResult) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if result.win_rate < 40.0 {
        suggestions.push(Suggestion::new(
            "win_rate",
            Priority::High,
            "Low win rate",
            format!(
                "The strategy wins {:.1}% of its trades. Consider tightening the entry \
                 criteria or adding a trend filter.",
                result.win_rate
            ),
            "Raise the RSI thresholds (oversold above 25, overbought below 75) or add a \
             trend filter based on a longer moving average.",
        ));
    } else if result.win_rate > 60.0 {
        suggestions.push(Suggestion::new(
            "win_rate",
            Priority::Low,
            "Excellent win rate",
            format!("The strategy wins {:.1}% of its trades.", result.win_rate),
            "Position sizes could be increased slightly to capture more of the edge.",
        ));
    }

    if result.profit_factor < 1.2 {
        suggestions.push(Suggestion::new(
            "profit_factor",
            Priority::High,
            "Low profit factor",
            format!(
                "The profit factor is {:.2}. Average losses are too large relative to \
                 average gains.",
                result.profit_factor
            ),
            "Tighten the stop loss or widen the take profit to improve the \
             risk/reward ratio.",
        ));
    }

    if result.max_drawdown > 30.0 {
        suggestions.push(Suggestion::new(
            "drawdown",
            Priority::High,
            "High maximum drawdown",
            format!(
                "The maximum drawdown is {:.1}%, which indicates large swings in capital.",
                result.max_drawdown
            ),
            "Reduce position sizes or add a capital protection mechanism.",
        ));
    }

    if result.sharpe_ratio < 1.0 {
        suggestions.push(Suggestion::new(
            "sharpe_ratio",
            Priority::Medium,
            "Suboptimal Sharpe ratio",
            format!(
                "The Sharpe ratio is {:.2}. Risk-adjusted returns leave room for \
                 improvement.",
                result.sharpe_ratio
            ),
            "Tune the strategy parameters to reduce the volatility of returns.",
        ));
    }

    if result.total_trades < 10 {
        suggestions.push(Suggestion::new(
            "trades",
            Priority::Medium,
            "Few trades",
            format!(
                "Only {} trades over the period. The strategy may be too selective.",
                result.total_trades
            ),
            "Loosen the entry criteria to generate more trading opportunities.",
        ));
    } else if result.total_trades > 200 {
        suggestions.push(Suggestion::new(
            "trades",
            Priority::Low,
            "Many trades",
            format!(
                "{} trades over the period. The strategy may be too active.",
                result.total_trades
            ),
            "Add filters to cut down the number of trades and improve their quality.",
        ));
    }

    if result.total_return < 0.0 {
        suggestions.push(Suggestion::new(
            "return",
            Priority::Critical,
            "Negative return",
            format!(
                "The strategy returned {:.1}% and is not profitable over this period.",
                result.total_return
            ),
            "Rework the strategy from the ground up. Consider a different timeframe, \
             instrument or parameter set.",
        ));
    } else if result.total_return > 50.0 {
        suggestions.push(Suggestion::new(
            "return",
            Priority::Low,
            "Excellent return",
            format!("The strategy returned {:.1}%.", result.total_return),
            "Make sure the results are not a product of over-fitting. Validate on other \
             periods to confirm robustness.",
        ));
    }

    if result.total_return > 0.0 && result.sharpe_ratio > 1.0 {
        suggestions.push(Suggestion::new(
            "optimization",
            Priority::Medium,
            "Parameter optimization",
            "The strategy shows promising results.".to_string(),
            "Try different combinations of SMA, RSI and stop loss/take profit settings \
             to find the best configuration, for example with a grid or genetic search.",
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> BacktestResult {
        BacktestResult {
            total_return: 12.0,
            sharpe_ratio: 1.5,
            max_drawdown: 10.0,
            win_rate: 50.0,
            total_trades: 40,
            profit_factor: 1.6,
            equity_curve: vec![10_000.0],
            trades: Vec::new(),
            final_capital: 11_200.0,
        }
    }

    fn kinds(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.kind.as_str()).collect()
    }

    #[test]
    fn healthy_result_only_suggests_optimization() {
        let suggestions = analyze(&result());
        assert_eq!(kinds(&suggestions), vec!["optimization"]);
        assert_eq!(suggestions[0].priority, Priority::Medium);
    }

    #[test]
    fn low_win_rate_outranks_high_win_rate() {
        let mut r = result();
        r.win_rate = 35.0;
        let suggestions = analyze(&r);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == "win_rate" && s.priority == Priority::High));

        r.win_rate = 65.0;
        let suggestions = analyze(&r);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == "win_rate" && s.priority == Priority::Low));
    }

    #[test]
    fn boundary_values_trigger_no_win_rate_advice() {
        let mut r = result();
        r.win_rate = 40.0;
        assert!(!analyze(&r).iter().any(|s| s.kind == "win_rate"));
        r.win_rate = 60.0;
        assert!(!analyze(&r).iter().any(|s| s.kind == "win_rate"));
    }

    #[test]
    fn negative_return_is_critical_and_suppresses_optimization() {
        let mut r = result();
        r.total_return = -8.0;
        let suggestions = analyze(&r);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == "return" && s.priority == Priority::Critical));
        assert!(!suggestions.iter().any(|s| s.kind == "optimization"));
    }

    #[test]
    fn weak_result_collects_multiple_suggestions() {
        let r = BacktestResult {
            total_return: -20.0,
            sharpe_ratio: 0.3,
            max_drawdown: 45.0,
            win_rate: 25.0,
            total_trades: 4,
            profit_factor: 0.6,
            equity_curve: vec![10_000.0],
            trades: Vec::new(),
            final_capital: 8_000.0,
        };
        let suggestions = analyze(&r);
        assert_eq!(
            kinds(&suggestions),
            vec![
                "win_rate",
                "profit_factor",
                "drawdown",
                "sharpe_ratio",
                "trades",
                "return"
            ]
        );
    }

    #[test]
    fn overactive_strategy_gets_trade_count_advice() {
        let mut r = result();
        r.total_trades = 250;
        let suggestions = analyze(&r);
        assert!(suggestions
            .iter()
            .any(|s| s.kind == "trades" && s.priority == Priority::Low));
    }
}
