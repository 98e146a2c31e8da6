//! Synthetic plate generation.
//!
//! Each well gets a logistic growth curve — baseline floor, exponential
//! rise, saturation plateau — with per-well parameters drawn from a seeded
//! RNG and multiplicative measurement noise on top. Deterministic for a
//! given seed, so sample runs are reproducible and usable in tests.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Plate, SampleConfig, TimeUnit, WellId, WellSeries};
use crate::error::AppError;

/// Generate a synthetic plate.
pub fn generate_plate(config: &SampleConfig, time_unit: TimeUnit) -> Result<Plate, AppError> {
    if config.rows == 0 || config.cols == 0 {
        return Err(AppError::new(2, "Sample plate must have rows and columns."));
    }
    if config.rows > 26 {
        return Err(AppError::new(2, "Sample plate supports at most 26 rows."));
    }
    if config.reads < 2 {
        return Err(AppError::new(2, "Sample plate needs at least 2 reads."));
    }
    if !(config.interval.is_finite() && config.interval > 0.0) {
        return Err(AppError::new(2, "Sample read interval must be > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Sample noise must be >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let time: Vec<f64> = (0..config.reads)
        .map(|i| i as f64 * config.interval)
        .collect();
    let duration = time[time.len() - 1];

    let mut wells = Vec::with_capacity(config.rows * config.cols);
    for row in 0..config.rows {
        let letter = (b'A' + row as u8) as char;
        for col in 0..config.cols {
            let id = WellId::parse(&format!("{letter}{}", col + 1))
                .ok_or_else(|| AppError::new(4, "Generated an invalid well id."))?;

            // Per-well culture parameters. Rates span slow to brisk growth
            // relative to the read window.
            let rate = rng.gen_range(0.01..=0.05);
            let floor = rng.gen_range(0.02..=0.06);
            let capacity = rng.gen_range(0.8..=1.5);
            let midpoint = rng.gen_range(0.35..=0.6) * duration;

            let values = time
                .iter()
                .map(|&t| {
                    let logistic = capacity / (1.0 + (-rate * (t - midpoint)).exp());
                    let z: f64 = normal.sample(&mut rng);
                    (floor + logistic) * (config.noise * z).exp()
                })
                .collect();

            wells.push(WellSeries { id, values });
        }
    }

    Ok(Plate {
        time,
        wells,
        time_unit,
    })
}
