//! Plate CSV ingest and normalization.
//!
//! The expected shape is what plate-reader exports produce: one `time`
//! column (numeric elapsed time, or `HH:MM:SS` clock stamps) and one column
//! per well, headed by the well label (`A1`..`H12`). Any other column is
//! metadata and is ignored — the core receives an explicit, validated well
//! list and never sniffs names itself.
//!
//! Design goals:
//! - **Strict schema** for the time column (clear errors + exit code 2)
//! - **Row-level tolerance**: an unreadable cell becomes a NaN reading and
//!   is handled by the validity filter, not by aborting the run
//! - **Deterministic behavior** (no hidden unit guessing beyond what is
//!   documented here)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use csv::StringRecord;

use crate::domain::{Plate, TimeUnit, WellId, WellSeries};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the validated plate plus bookkeeping for reporting.
#[derive(Debug, Clone)]
pub struct IngestedPlate {
    pub plate: Plate,
    /// Header names that were not `time` and not well-shaped.
    pub ignored_columns: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a plate CSV from disk.
pub fn load_plate(path: &Path, time_unit: TimeUnit) -> Result<IngestedPlate, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open plate CSV '{}': {e}", path.display()),
        )
    })?;
    parse_plate(file, time_unit)
}

/// Parse a plate CSV from any reader (split out for tests).
pub fn parse_plate<R: Read>(reader: R, time_unit: TimeUnit) -> Result<IngestedPlate, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let (time_col, well_cols, ignored_columns) = classify_headers(&headers)?;

    let mut time = Vec::new();
    let mut series: Vec<Vec<f64>> = vec![Vec::new(); well_cols.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(t) = record
            .get(time_col)
            .and_then(|s| parse_time_cell(s, time_unit))
        else {
            // Trailing rows without a usable timestamp are common in plate
            // exports; drop the whole row and note it.
            row_errors.push(RowError {
                line,
                message: "missing or unparseable time value".to_string(),
            });
            continue;
        };

        time.push(t);
        for (slot, &(col, _)) in series.iter_mut().zip(well_cols.iter()) {
            slot.push(parse_reading(record.get(col)));
        }
    }

    if time.is_empty() {
        return Err(AppError::new(3, "No data rows with a usable time value."));
    }
    if time.windows(2).any(|w| w[1] < w[0]) {
        return Err(AppError::new(
            3,
            "Time axis is not monotonically non-decreasing.",
        ));
    }

    let wells = well_cols
        .into_iter()
        .zip(series)
        .map(|((_, id), values)| WellSeries { id, values })
        .collect();

    Ok(IngestedPlate {
        plate: Plate {
            time,
            wells,
            time_unit,
        },
        ignored_columns,
        row_errors,
        rows_read,
    })
}

type HeaderSplit = (usize, Vec<(usize, WellId)>, Vec<String>);

fn classify_headers(headers: &StringRecord) -> Result<HeaderSplit, AppError> {
    let mut time_col = None;
    let mut well_cols = Vec::new();
    let mut ignored = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (idx, raw) in headers.iter().enumerate() {
        // Excel-style exports may carry a BOM on the first header; without
        // stripping it the `time` column is reported as missing.
        let name = raw.trim().trim_start_matches('\u{feff}');
        if name.eq_ignore_ascii_case("time") {
            if time_col.is_none() {
                time_col = Some(idx);
            } else {
                ignored.push(raw.to_string());
            }
            continue;
        }

        match WellId::parse(name) {
            Some(id) => {
                if let Some(&first) = seen.get(id.as_str()) {
                    return Err(AppError::new(
                        2,
                        format!(
                            "Duplicate well column `{id}` (columns {} and {}).",
                            first + 1,
                            idx + 1
                        ),
                    ));
                }
                seen.insert(id.as_str().to_string(), idx);
                well_cols.push((idx, id));
            }
            None => ignored.push(raw.to_string()),
        }
    }

    let Some(time_col) = time_col else {
        return Err(AppError::new(2, "Missing required column: `time`"));
    };
    if well_cols.is_empty() {
        return Err(AppError::new(
            3,
            "No well columns found (expected headers shaped like `A1`).",
        ));
    }

    Ok((time_col, well_cols, ignored))
}

/// Parse one time cell: a plain number in the configured unit, or a clock
/// stamp (`HH:MM:SS` / `HH:MM`) converted into that unit.
fn parse_time_cell(s: &str, time_unit: TimeUnit) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            let seconds = t.num_seconds_from_midnight() as f64;
            return Some(seconds / time_unit.seconds_per_unit());
        }
    }
    None
}

/// Parse one OD cell. Anything unreadable becomes NaN, which the validity
/// filter excludes like any other unusable reading.
fn parse_reading(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wells_and_ignores_metadata() {
        let csv = "Time,A1,A2,Temperature\n0,0.05,0.04,37.0\n10,0.08,0.05,37.1\n";
        let ingested = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap();

        let plate = &ingested.plate;
        assert_eq!(plate.time, vec![0.0, 10.0]);
        assert_eq!(plate.wells.len(), 2);
        assert_eq!(plate.wells[0].id.as_str(), "A1");
        assert_eq!(plate.wells[0].values, vec![0.05, 0.08]);
        assert_eq!(ingested.ignored_columns, vec!["Temperature".to_string()]);
    }

    #[test]
    fn clock_stamps_convert_to_the_configured_unit() {
        let csv = "time,B2\n0:00:00,0.05\n0:30:00,0.08\n1:00:00,0.12\n";
        let ingested = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap();
        assert_eq!(ingested.plate.time, vec![0.0, 30.0, 60.0]);

        let ingested = parse_plate(csv.as_bytes(), TimeUnit::Hours).unwrap();
        assert_eq!(ingested.plate.time, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn unreadable_cells_become_nan_readings() {
        let csv = "time,A1\n0,0.05\n10,\n20,n/a\n30,0.2\n";
        let ingested = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap();

        let values = &ingested.plate.wells[0].values;
        assert_eq!(values.len(), 4);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
        assert_eq!(values[3], 0.2);
    }

    #[test]
    fn rows_without_time_are_skipped_and_reported() {
        let csv = "time,A1\n0,0.05\n,0.06\n20,0.08\n";
        let ingested = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap();

        assert_eq!(ingested.plate.time, vec![0.0, 20.0]);
        assert_eq!(ingested.plate.wells[0].values, vec![0.05, 0.08]);
        assert_eq!(ingested.row_errors.len(), 1);
        assert_eq!(ingested.row_errors[0].line, 3);
    }

    #[test]
    fn missing_time_column_is_a_schema_error() {
        let csv = "A1,A2\n0.05,0.04\n";
        let err = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_monotone_axis_is_rejected() {
        let csv = "time,A1\n0,0.05\n20,0.08\n10,0.1\n";
        let err = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn duplicate_well_columns_are_rejected() {
        let csv = "time,A1,A1\n0,0.05,0.06\n";
        let err = parse_plate(csv.as_bytes(), TimeUnit::Minutes).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
