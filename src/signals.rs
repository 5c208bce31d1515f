use crate::config::StrategyConfig;
use crate::indicators::{rolling_rsi, simple_moving_average};
use crate::models::PriceSeries;

/// The complete per-bar signal vocabulary. No other indicator combination is
/// consulted by the state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarSignals {
    pub cross_up: bool,
    pub cross_down: bool,
    pub oversold: bool,
    pub overbought: bool,
}

impl BarSignals {
    pub fn long_entry(&self) -> bool {
        self.cross_up || self.oversold
    }

    pub fn short_entry(&self) -> bool {
        self.cross_down || self.overbought
    }
}

/// Precomputed indicator series plus the thresholds needed to derive
/// [`BarSignals`] for any bar index. Any comparison involving a non-finite
/// indicator value yields `false`, so warm-up NaNs and the zero-loss RSI
/// sentinel can never reach the position state machine.
pub struct SignalSeries {
    sma_short: Vec<f64>,
    sma_long: Vec<f64>,
    rsi: Vec<f64>,
    oversold_level: f64,
    overbought_level: f64,
}

impl SignalSeries {
    pub fn compute(series: &PriceSeries, config: &StrategyConfig) -> Self {
        let closes = series.closes();
        Self {
            sma_short: simple_moving_average(&closes, config.sma_short),
            sma_long: simple_moving_average(&closes, config.sma_long),
            rsi: rolling_rsi(&closes, config.rsi_period),
            oversold_level: config.rsi_oversold,
            overbought_level: config.rsi_overbought,
        }
    }

    pub fn at(&self, index: usize) -> BarSignals {
        let mut signals = BarSignals::default();
        if index == 0 || index >= self.sma_short.len() {
            return signals;
        }

        let short_now = self.sma_short[index];
        let long_now = self.sma_long[index];
        let short_prev = self.sma_short[index - 1];
        let long_prev = self.sma_long[index - 1];
        if short_now.is_finite()
            && long_now.is_finite()
            && short_prev.is_finite()
            && long_prev.is_finite()
        {
            signals.cross_up = short_now > long_now && short_prev <= long_prev;
            signals.cross_down = short_now < long_now && short_prev >= long_prev;
        }

        let rsi = self.rsi[index];
        if rsi.is_finite() {
            signals.oversold = rsi < self.oversold_level;
            signals.overbought = rsi > self.overbought_level;
        }

        signals
    }
}
