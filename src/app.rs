//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or generates a plate
//! - runs the per-well estimation batch
//! - prints the summary/table and optional plot
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, EstimatorArgs, FitArgs, OutputArgs, PlotArgs, SampleArgs};
use crate::domain::{EstimatorConfig, FilterKind, FilterPolicy, Plate, RunConfig, SampleConfig};
use crate::error::AppError;
use crate::io::ingest::IngestedPlate;

pub mod pipeline;

/// Entry point for the `odg` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.estimator, &args.output)?;
    let ingested = crate::io::ingest::load_plate(&args.plate, config.time_unit)?;
    report_ingest_notes(&ingested);

    run_batch(&ingested.plate, &config)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.estimator, &args.output)?;
    let sample = SampleConfig {
        rows: args.rows,
        cols: args.cols,
        reads: args.reads,
        interval: args.interval,
        noise: args.noise,
        seed: args.seed,
    };
    let plate = crate::data::sample::generate_plate(&sample, config.time_unit)?;

    run_batch(&plate, &config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_well_curve_json(&args.curve)?;
    let plot = crate::plot::render_well_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

/// Shared tail of `fit` and `sample`: estimate, report, plot, export.
fn run_batch(plate: &Plate, config: &RunConfig) -> Result<(), AppError> {
    let outcomes = pipeline::run_plate(plate, &config.estimator);
    let summary = pipeline::summarize(&outcomes);

    print!(
        "{}",
        crate::report::format_run_summary(plate, &summary, &config.estimator)
    );
    print!("{}", crate::report::format_results_table(&outcomes, plate));

    if let Some(label) = &config.plot_well {
        let outcome = outcomes
            .iter()
            .find(|o| o.well.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| AppError::new(2, format!("Unknown well `{label}`.")))?;
        match &outcome.fit {
            Ok(fit) => {
                let plot = crate::plot::render_well_plot(
                    &outcome.well,
                    fit,
                    plate.time_unit,
                    config.plot_width,
                    config.plot_height,
                );
                println!("\n{plot}");
            }
            Err(err) => println!("\n{}: no plot ({err})", outcome.well),
        }
    }

    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &outcomes, plate.time_unit)?;
    }
    if let Some(dir) = &config.export_curves {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to create curve directory '{}': {e}", dir.display()),
            )
        })?;
        for outcome in &outcomes {
            if let Ok(fit) = &outcome.fit {
                let path = dir.join(format!("{}.json", outcome.well));
                crate::io::curve::write_well_curve_json(
                    &path,
                    &outcome.well,
                    fit,
                    &config.estimator,
                    plate.time_unit,
                )?;
            }
        }
    }

    Ok(())
}

fn report_ingest_notes(ingested: &IngestedPlate) {
    if !ingested.ignored_columns.is_empty() {
        eprintln!(
            "note: ignored {} non-well column(s): {}",
            ingested.ignored_columns.len(),
            ingested.ignored_columns.join(", ")
        );
    }
    for err in &ingested.row_errors {
        eprintln!("note: line {}: {}", err.line, err.message);
    }
}

/// Resolve CLI flags into the validated run configuration.
pub fn run_config_from_args(
    estimator: &EstimatorArgs,
    output: &OutputArgs,
) -> Result<RunConfig, AppError> {
    if !(estimator.smoothing.is_finite() && estimator.smoothing >= 0.0) {
        return Err(AppError::new(2, "Smoothing factor must be finite and >= 0."));
    }
    if !estimator.background.is_finite() {
        return Err(AppError::new(2, "Background must be finite."));
    }
    if !(estimator.window.is_finite() && estimator.window > 0.0) {
        return Err(AppError::new(2, "Prediction window must be > 0."));
    }
    if !estimator.cutoff.is_finite() {
        return Err(AppError::new(2, "Cutoff must be finite."));
    }

    Ok(RunConfig {
        estimator: EstimatorConfig {
            smoothing: estimator.smoothing,
            background: estimator.background,
            policy: resolve_policy(estimator.filter, estimator.cutoff),
            mode: estimator.mode,
            window: estimator.window,
        },
        time_unit: estimator.time_unit,
        plot_well: output.plot_well.clone(),
        plot_width: output.width,
        plot_height: output.height,
        export_results: output.export.clone(),
        export_curves: output.export_curves.clone(),
    })
}

fn resolve_policy(kind: FilterKind, cutoff: f64) -> FilterPolicy {
    match kind {
        FilterKind::FiniteLog => FilterPolicy::FiniteLog,
        FilterKind::Cutoff => FilterPolicy::AbsoluteCutoff(cutoff),
        FilterKind::LogCutoff => FilterPolicy::LogCutoff(cutoff),
    }
}
