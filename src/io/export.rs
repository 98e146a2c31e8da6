//! Export the per-well result table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. Failed wells keep their row with empty numeric fields — an
//! explicit null, never a fabricated zero — plus the failure reason.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::WellOutcome;
use crate::domain::TimeUnit;
use crate::error::AppError;

/// Write the result table to a CSV file.
pub fn write_results_csv(
    path: &Path,
    outcomes: &[WellOutcome],
    time_unit: TimeUnit,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    write_results(&mut file, outcomes, time_unit)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))
}

fn write_results(
    out: &mut dyn Write,
    outcomes: &[WellOutcome],
    time_unit: TimeUnit,
) -> std::io::Result<()> {
    writeln!(
        out,
        "well,growth_rate_per_{unit},doubling_time_{unit},max_time_{unit},max_index,status",
        unit = time_unit.label()
    )?;

    for outcome in outcomes {
        match &outcome.fit {
            Ok(fit) => {
                let e = &fit.estimate;
                writeln!(
                    out,
                    "{},{:.10},{:.10},{:.10},{},ok",
                    outcome.well, e.rate, e.doubling_time, e.max_time, e.max_index
                )?;
            }
            Err(err) => {
                writeln!(out, "{},,,,,{err}", outcome.well)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GrowthEstimate, PredictionLine, WellFit, WellId};
    use crate::error::EstimateError;

    fn ok_outcome(id: &str, rate: f64) -> WellOutcome {
        WellOutcome {
            well: WellId::parse(id).unwrap(),
            fit: Ok(WellFit {
                estimate: GrowthEstimate {
                    rate,
                    max_time: 40.0,
                    max_index: 4,
                    doubling_time: std::f64::consts::LN_2 / rate,
                },
                log_points: vec![],
                fitted: vec![],
                prediction: PredictionLine {
                    time: vec![],
                    value: vec![],
                },
            }),
        }
    }

    #[test]
    fn failed_wells_export_empty_fields() {
        let outcomes = vec![
            ok_outcome("A1", 0.05),
            WellOutcome {
                well: WellId::parse("A2").unwrap(),
                fit: Err(EstimateError::InsufficientData { have: 2, need: 6 }),
            },
        ];

        let mut buf = Vec::new();
        write_results(&mut buf, &outcomes, TimeUnit::Minutes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("well,growth_rate_per_min"));
        assert!(lines[1].starts_with("A1,0.05"));
        assert!(lines[2].starts_with("A2,,,,,insufficient data"));
    }
}
