use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use log::info;

use crate::data::generate_demo_series;

pub fn run(output: &Path, seed: u64, bars: usize, start_price: f64) -> Result<()> {
    let start = Utc::now() - Duration::days(bars as i64);
    let series = generate_demo_series(seed, bars, start, start_price)?;
    let json = serde_json::to_string_pretty(series.bars())?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} bars to {}", series.len(), output.display());
    Ok(())
}
