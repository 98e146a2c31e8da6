//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A validated well identifier.
///
/// Plate exports label data columns `A1`..`H12` (letter row, numeric column);
/// anything else in the header row is metadata. Validation happens once at
/// construction so the core never has to sniff column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WellId(String);

impl WellId {
    /// Accept identifiers shaped `<letter><digit>...` (e.g. `A1`, `h12`).
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let first = chars.next()?;
        let second = chars.next()?;
        if first.is_ascii_alphabetic() && second.is_ascii_digit() {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One well's measurement sequence, aligned by index to the plate time axis.
#[derive(Debug, Clone)]
pub struct WellSeries {
    pub id: WellId,
    pub values: Vec<f64>,
}

/// A complete plate read: one shared time axis, one series per well.
///
/// Invariant (enforced at ingest/generation): every series has the same
/// length as the axis, and the axis is monotonically non-decreasing.
#[derive(Debug, Clone)]
pub struct Plate {
    pub time: Vec<f64>,
    pub wells: Vec<WellSeries>,
    pub time_unit: TimeUnit,
}

/// Unit of the elapsed-time axis (consistent across a run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minutes,
    Hours,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        })
    }
}

impl TimeUnit {
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
        }
    }

    /// Seconds per unit, used when converting clock stamps from the input.
    pub fn seconds_per_unit(self) -> f64 {
        match self {
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
        }
    }
}

/// Which validity filter to apply before fitting (CLI selector).
///
/// The threshold for the cutoff variants comes from `--cutoff`; the resolved
/// run-time policy is [`FilterPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Keep points whose `ln(od - background)` is finite.
    FiniteLog,
    /// Keep points with `od > cutoff` (raw scale).
    Cutoff,
    /// Keep points with `ln(od) > cutoff` (log scale).
    LogCutoff,
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FilterKind::FiniteLog => "finite-log",
            FilterKind::Cutoff => "cutoff",
            FilterKind::LogCutoff => "log-cutoff",
        })
    }
}

/// Resolved validity-filter policy (mutually exclusive per run).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cutoff", rename_all = "kebab-case")]
pub enum FilterPolicy {
    /// Keep points whose `ln(od - background)` is finite; non-positive
    /// readings are indistinguishable from noise.
    FiniteLog,
    /// Keep points with `od > cutoff` on the raw scale.
    AbsoluteCutoff(f64),
    /// Keep points with `ln(od) > cutoff`.
    LogCutoff(f64),
}

/// Which growth-rate definition the peak selector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RateMode {
    /// Fit `ln(od - background)`; the rate is the spline slope directly.
    LogSlope,
    /// Fit the raw background-subtracted curve; the rate is
    /// `alpha = g'(t) / g(t)`, with a second-derivative check that alpha is
    /// not monotonically decreasing over the whole series.
    Specific,
}

impl std::fmt::Display for RateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RateMode::LogSlope => "log-slope",
            RateMode::Specific => "specific",
        })
    }
}

/// Per-run estimator configuration.
///
/// One instance per run, shared read-only across wells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Smoothing factor `s`: 0 interpolates the eligible points, larger
    /// values increasingly penalize curvature. The dominant quality knob.
    pub smoothing: f64,
    /// Constant background subtracted before the log transform.
    pub background: f64,
    pub policy: FilterPolicy,
    pub mode: RateMode,
    /// Half-width of the prediction-line window, in time-axis units.
    pub window: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.2,
            background: 0.0,
            policy: FilterPolicy::FiniteLog,
            mode: RateMode::LogSlope,
            window: 100.0,
        }
    }
}

/// The persisted per-well output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthEstimate {
    /// Maximum log-slope, in 1/time-unit.
    pub rate: f64,
    /// Time of the peak, in time-axis units.
    pub max_time: f64,
    /// Index of the peak into the original (pre-filter) series.
    pub max_index: usize,
    /// `ln(2) / rate`.
    pub doubling_time: f64,
}

/// Linear approximation of the trajectory around the peak, for diagnostic
/// overlay on the raw log-curve. Purely derived, no fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionLine {
    pub time: Vec<f64>,
    pub value: Vec<f64>,
}

/// Estimate plus everything an external renderer needs to draw it.
///
/// Returned explicitly instead of mutating any shared drawing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellFit {
    pub estimate: GrowthEstimate,
    /// Eligible raw points on the log scale: `(t, ln(od - background))`.
    pub log_points: Vec<(f64, f64)>,
    /// The fitted curve on a fine grid over the eligible domain (log scale).
    pub fitted: Vec<(f64, f64)>,
    pub prediction: PredictionLine,
}

/// Synthetic plate generation parameters.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Plate rows (`A`, `B`, ...).
    pub rows: usize,
    /// Plate columns (`1`, `2`, ...).
    pub cols: usize,
    /// Number of reads along the time axis.
    pub reads: usize,
    /// Spacing between reads, in time-axis units.
    pub interval: f64,
    /// Multiplicative measurement noise (log-scale standard deviation).
    pub noise: f64,
    pub seed: u64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub estimator: EstimatorConfig,
    pub time_unit: TimeUnit,

    /// Render an ASCII diagnostic plot for this well after the batch.
    pub plot_well: Option<String>,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    /// Directory for per-well curve JSON files.
    pub export_curves: Option<PathBuf>,
}
