//! Command-line parsing for the OD growth-rate finder.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the estimation/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{FilterKind, RateMode, TimeUnit};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "odg",
    version,
    about = "OD growth-rate finder for plate-reader time series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate growth rates for every well of a plate CSV.
    Fit(FitArgs),
    /// Run the estimator over a seeded synthetic plate (demo/validation).
    Sample(SampleArgs),
    /// Re-render a previously exported well curve JSON.
    Plot(PlotArgs),
}

/// Estimator configuration shared by `fit` and `sample`.
#[derive(Debug, Parser, Clone)]
pub struct EstimatorArgs {
    /// Smoothing factor `s` (0 interpolates the eligible points).
    #[arg(short = 's', long, default_value_t = 0.2)]
    pub smoothing: f64,

    /// Constant background subtracted before the log transform.
    #[arg(short = 'b', long, default_value_t = 0.0)]
    pub background: f64,

    /// Validity filter applied before fitting.
    #[arg(long, value_enum, default_value_t = FilterKind::FiniteLog)]
    pub filter: FilterKind,

    /// Threshold for the cutoff filter variants.
    #[arg(long, default_value_t = 0.02)]
    pub cutoff: f64,

    /// Growth-rate definition reported by the peak selector.
    #[arg(long, value_enum, default_value_t = RateMode::LogSlope)]
    pub mode: RateMode,

    /// Half-width of the prediction-line window (time units around the peak).
    #[arg(short = 'w', long, default_value_t = 100.0)]
    pub window: f64,

    /// Unit of the time axis.
    #[arg(long, value_enum, default_value_t = TimeUnit::Minutes)]
    pub time_unit: TimeUnit,
}

/// Output options shared by `fit` and `sample`.
#[derive(Debug, Parser, Clone)]
pub struct OutputArgs {
    /// Render an ASCII diagnostic plot for one well (e.g. `A1`).
    #[arg(long)]
    pub plot_well: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 28)]
    pub height: usize,

    /// Export the result table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export per-well curve JSON files into this directory.
    #[arg(long)]
    pub export_curves: Option<PathBuf>,
}

/// Options for `odg fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Plate CSV: a `time` column plus one column per well (`A1`...).
    pub plate: PathBuf,

    #[command(flatten)]
    pub estimator: EstimatorArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `odg sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Plate rows to generate (A, B, ...).
    #[arg(long, default_value_t = 8)]
    pub rows: usize,

    /// Plate columns to generate.
    #[arg(long, default_value_t = 12)]
    pub cols: usize,

    /// Number of reads along the time axis.
    #[arg(long, default_value_t = 97)]
    pub reads: usize,

    /// Spacing between reads, in time-axis units.
    #[arg(long, default_value_t = 10.0)]
    pub interval: f64,

    /// Multiplicative measurement noise (log-scale standard deviation).
    #[arg(long, default_value_t = 0.02)]
    pub noise: f64,

    /// Random seed for plate generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub estimator: EstimatorArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `odg plot`.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Curve JSON previously written by `--export-curves`.
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 28)]
    pub height: usize,
}
