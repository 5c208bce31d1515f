use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One OHLCV sample at a given timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("price series must contain at least one bar")]
    Empty,
    #[error("bar {index} is not strictly after the previous bar")]
    OutOfOrder { index: usize },
    #[error("bar {index} field `{field}` must be a finite non-negative number (value: {value})")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// An ordered, validated sequence of price bars. The engine never mutates it;
/// derived series are computed into fresh buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validates ordering and field sanity before the series can reach the
    /// engine. Timestamps must be strictly increasing; every OHLCV field must
    /// be finite and non-negative.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, bar) in bars.iter().enumerate() {
            for (field, value) in [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
                ("volume", bar.volume),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SeriesError::InvalidField {
                        index,
                        field,
                        value,
                    });
                }
            }

            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(SeriesError::OutOfOrder { index });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Long => "long",
            TradeDirection::Short => "short",
        }
    }
}

/// A realized round trip. Created only when a position closes; never mutated
/// afterwards. `pnl_pct` is expressed in percentage points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub entry_date: DateTime<Utc>,
    pub exit_date: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub direction: TradeDirection,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// The immutable output contract of one simulation run. Summary fields,
/// `final_capital`, and the equity curve are rounded to 2 decimals; trades
/// keep full precision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestResult {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub profit_factor: f64,
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
    pub final_capital: f64,
}
