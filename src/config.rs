use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("smaShort must be greater than zero")]
    SmaShortZero,
    #[error("smaLong ({long}) must be greater than smaShort ({short})")]
    SmaWindowOrder { short: usize, long: usize },
    #[error("rsiPeriod must be greater than zero")]
    RsiPeriodZero,
    #[error("rsiOversold must be between 0 and 100 exclusive (value: {0})")]
    RsiOversoldRange(f64),
    #[error("rsiOverbought ({overbought}) must be above rsiOversold ({oversold}) and below 100")]
    RsiThresholdOrder { oversold: f64, overbought: f64 },
    #[error("stopLoss must be between 0 and 1 exclusive (value: {0})")]
    StopLossRange(f64),
    #[error("takeProfit must be a positive finite number (value: {0})")]
    TakeProfitRange(f64),
}

/// Validated strategy parameters consumed by the signal evaluator and the
/// position state machine. Construct through [`StrategyConfig::from_parameters`]
/// or validate a hand-built value with [`StrategyConfig::validate`] before
/// running a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Fractional loss that forces an exit, e.g. 0.02 for 2%.
    pub stop_loss: f64,
    /// Fractional gain that forces an exit, e.g. 0.04 for 4%.
    pub take_profit: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stop_loss: 0.02,
            take_profit: 0.04,
        }
    }
}

impl StrategyConfig {
    /// Builds a config from the fixed parameter record an upstream extractor
    /// supplies, falling back to the defaults for missing keys, then
    /// validates the combined result.
    pub fn from_parameters(parameters: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            sma_short: get_param_usize(parameters, "smaShort", defaults.sma_short),
            sma_long: get_param_usize(parameters, "smaLong", defaults.sma_long),
            rsi_period: get_param_usize(parameters, "rsiPeriod", defaults.rsi_period),
            rsi_oversold: get_param_f64(parameters, "rsiOversold", defaults.rsi_oversold),
            rsi_overbought: get_param_f64(parameters, "rsiOverbought", defaults.rsi_overbought),
            stop_loss: get_param_f64(parameters, "stopLoss", defaults.stop_loss),
            take_profit: get_param_f64(parameters, "takeProfit", defaults.take_profit),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sma_short == 0 {
            return Err(ConfigError::SmaShortZero);
        }
        if self.sma_long <= self.sma_short {
            return Err(ConfigError::SmaWindowOrder {
                short: self.sma_short,
                long: self.sma_long,
            });
        }
        if self.rsi_period == 0 {
            return Err(ConfigError::RsiPeriodZero);
        }
        if !self.rsi_oversold.is_finite() || self.rsi_oversold <= 0.0 || self.rsi_oversold >= 100.0
        {
            return Err(ConfigError::RsiOversoldRange(self.rsi_oversold));
        }
        if !self.rsi_overbought.is_finite()
            || self.rsi_overbought <= self.rsi_oversold
            || self.rsi_overbought >= 100.0
        {
            return Err(ConfigError::RsiThresholdOrder {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }
        if !self.stop_loss.is_finite() || self.stop_loss <= 0.0 || self.stop_loss >= 1.0 {
            return Err(ConfigError::StopLossRange(self.stop_loss));
        }
        if !self.take_profit.is_finite() || self.take_profit <= 0.0 {
            return Err(ConfigError::TakeProfitRange(self.take_profit));
        }
        Ok(())
    }

    /// Bars consumed purely by indicator warm-up. Trading starts at this
    /// index; earlier bars never reach the state machine.
    pub fn warmup_bars(&self) -> usize {
        self.sma_long.max(self.rsi_period)
    }
}

fn get_param_f64(params: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

fn get_param_usize(params: &HashMap<String, f64>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .copied()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as usize)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(StrategyConfig::default().validate().is_ok());
        assert_eq!(StrategyConfig::default().warmup_bars(), 50);
    }

    #[test]
    fn from_parameters_overrides_defaults() {
        let mut params = HashMap::new();
        params.insert("smaShort".to_string(), 5.0);
        params.insert("smaLong".to_string(), 12.0);
        params.insert("stopLoss".to_string(), 0.05);

        let config = StrategyConfig::from_parameters(&params).unwrap();
        assert_eq!(config.sma_short, 5);
        assert_eq!(config.sma_long, 12);
        assert!((config.stop_loss - 0.05).abs() < 1e-12);
        // untouched keys keep their defaults
        assert_eq!(config.rsi_period, 14);
        assert!((config.take_profit - 0.04).abs() < 1e-12);
    }

    #[test]
    fn rejects_sma_ordering_violation() {
        let config = StrategyConfig {
            sma_short: 50,
            sma_long: 20,
            ..StrategyConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::SmaWindowOrder {
                short: 50,
                long: 20
            }
        );
    }

    #[test]
    fn rejects_zero_windows() {
        let config = StrategyConfig {
            sma_short: 0,
            ..StrategyConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::SmaShortZero);

        let config = StrategyConfig {
            rsi_period: 0,
            ..StrategyConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::RsiPeriodZero);
    }

    #[test]
    fn rejects_rsi_threshold_violations() {
        let config = StrategyConfig {
            rsi_oversold: 0.0,
            ..StrategyConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::RsiOversoldRange(_)
        ));

        let config = StrategyConfig {
            rsi_oversold: 60.0,
            rsi_overbought: 40.0,
            ..StrategyConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::RsiThresholdOrder { .. }
        ));

        let config = StrategyConfig {
            rsi_overbought: 100.0,
            ..StrategyConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::RsiThresholdOrder { .. }
        ));
    }

    #[test]
    fn rejects_protective_threshold_violations() {
        for stop_loss in [0.0, 1.0, -0.1, f64::NAN] {
            let config = StrategyConfig {
                stop_loss,
                ..StrategyConfig::default()
            };
            assert!(matches!(
                config.validate().unwrap_err(),
                ConfigError::StopLossRange(_)
            ));
        }

        for take_profit in [0.0, -1.0, f64::INFINITY] {
            let config = StrategyConfig {
                take_profit,
                ..StrategyConfig::default()
            };
            assert!(matches!(
                config.validate().unwrap_err(),
                ConfigError::TakeProfitRange(_)
            ));
        }
    }

    #[test]
    fn non_finite_parameter_values_fall_back_to_defaults_for_windows() {
        let mut params = HashMap::new();
        params.insert("smaShort".to_string(), f64::NAN);
        let config = StrategyConfig::from_parameters(&params).unwrap();
        assert_eq!(config.sma_short, 20);
    }
}
