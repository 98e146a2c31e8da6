//! Read/write per-well curve JSON files.
//!
//! Curve JSON is the "portable" representation of one well's fit — the data
//! an external renderer needs and nothing else:
//! - the growth estimate
//! - the eligible raw points on the log scale
//! - the fitted curve on a fine grid
//! - the prediction line around the peak

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{EstimatorConfig, RateMode, TimeUnit, WellFit, WellId};
use crate::error::AppError;

/// Schema of an exported well curve file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellCurveFile {
    pub tool: String,
    pub well: WellId,
    pub time_unit: TimeUnit,
    pub mode: RateMode,
    pub smoothing: f64,
    #[serde(flatten)]
    pub fit: WellFit,
}

/// Write one well's curve JSON.
pub fn write_well_curve_json(
    path: &Path,
    well: &WellId,
    fit: &WellFit,
    config: &EstimatorConfig,
    time_unit: TimeUnit,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create curve JSON '{}': {e}", path.display()),
        )
    })?;

    let curve = WellCurveFile {
        tool: "odg".to_string(),
        well: well.clone(),
        time_unit,
        mode: config.mode,
        smoothing: config.smoothing,
        fit: fit.clone(),
    };

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a previously exported well curve JSON.
pub fn read_well_curve_json(path: &Path) -> Result<WellCurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open curve JSON '{}': {e}", path.display()),
        )
    })?;
    let curve: WellCurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}
