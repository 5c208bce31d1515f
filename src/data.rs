//! Price data loading and synthetic data generation.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::models::{PriceBar, PriceSeries, SeriesError};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    InvalidSeries(#[from] SeriesError),
}

/// Anything that can produce a validated price series.
pub trait PriceSource {
    fn fetch(&self) -> Result<PriceSeries, DataError>;
}

/// Loads a series from a JSON file containing an array of price bars.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

impl PriceSource for JsonFileSource {
    fn fetch(&self) -> Result<PriceSeries, DataError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        let bars: Vec<PriceBar> =
            serde_json::from_str(&contents).map_err(|source| DataError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(PriceSeries::new(bars)?)
    }
}

/// Generates a reproducible random-walk series of daily bars starting
/// at `start`. The close follows a walk of normal steps with standard
/// deviation 0.5 from `start_price`, floored at 1.0 so the series
/// stays valid even for long runs.
pub fn generate_demo_series(
    seed: u64,
    bars: usize,
    start: DateTime<Utc>,
    start_price: f64,
) -> Result<PriceSeries, DataError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = start_price;
    let mut out = Vec::with_capacity(bars);
    for i in 0..bars {
        price = (price + standard_normal(&mut rng) * 0.5).max(1.0);
        let open = price * (1.0 + standard_normal(&mut rng) * 0.01);
        let high = price * (1.0 + standard_normal(&mut rng).abs() * 0.02);
        let low = price * (1.0 - standard_normal(&mut rng).abs() * 0.02).max(0.0);
        out.push(PriceBar {
            date: start + Duration::days(i as i64),
            open,
            high,
            low,
            close: price,
            volume: rng.gen_range(1_000_000.0..10_000_000.0),
        });
    }
    Ok(PriceSeries::new(out)?)
}

/// Standard normal draw via the Box-Muller transform.
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
