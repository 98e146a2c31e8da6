//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/estimation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::{BatchSummary, WellOutcome};
use crate::domain::{EstimatorConfig, FilterPolicy, Plate, RateMode};

/// Format the run summary (plate stats + configuration + outcome counts).
pub fn format_run_summary(
    plate: &Plate,
    summary: &BatchSummary,
    config: &EstimatorConfig,
) -> String {
    let mut out = String::new();

    let unit = plate.time_unit.label();
    let t_min = plate.time.first().copied().unwrap_or(0.0);
    let t_max = plate.time.last().copied().unwrap_or(0.0);

    out.push_str("=== odg - OD growth-rate finder ===\n");
    out.push_str(&format!(
        "Plate: {} wells | {} reads | t=[{t_min:.1}, {t_max:.1}]{unit}\n",
        plate.wells.len(),
        plate.time.len(),
    ));
    out.push_str(&format!(
        "Filter: {} | background={}\n",
        policy_label(config.policy),
        config.background,
    ));
    out.push_str(&format!(
        "Mode: {} | smoothing s={}\n",
        mode_label(config.mode),
        config.smoothing,
    ));

    out.push_str(&format!(
        "\nEstimated {}/{} wells",
        summary.estimated, summary.wells
    ));
    let mut reasons = Vec::new();
    if summary.insufficient_data > 0 {
        reasons.push(format!("{} insufficient data", summary.insufficient_data));
    }
    if summary.no_exponential_phase > 0 {
        reasons.push(format!(
            "{} no exponential phase",
            summary.no_exponential_phase
        ));
    }
    if summary.malformed > 0 {
        reasons.push(format!("{} malformed", summary.malformed));
    }
    if !reasons.is_empty() {
        out.push_str(&format!(" ({})", reasons.join(", ")));
    }
    out.push_str("\n\n");

    out
}

/// Format the per-well result table. Failed wells keep their row with `-`
/// in every numeric column.
pub fn format_results_table(outcomes: &[WellOutcome], plate: &Plate) -> String {
    let unit = plate.time_unit.label();
    let mut out = String::new();

    out.push_str(&format!(
        "{:<6} {:>14} {:>14} {:>10} {:>9}  {}\n",
        "well",
        format!("rate (1/{unit})"),
        format!("doubling ({unit})"),
        format!("t_max ({unit})"),
        "max_idx",
        "status"
    ));

    for outcome in outcomes {
        match &outcome.fit {
            Ok(fit) => {
                let e = &fit.estimate;
                out.push_str(&format!(
                    "{:<6} {:>14.5} {:>14.2} {:>10.1} {:>9}  ok\n",
                    outcome.well.as_str(),
                    e.rate,
                    e.doubling_time,
                    e.max_time,
                    e.max_index
                ));
            }
            Err(err) => {
                out.push_str(&format!(
                    "{:<6} {:>14} {:>14} {:>10} {:>9}  {err}\n",
                    outcome.well.as_str(),
                    "-",
                    "-",
                    "-",
                    "-"
                ));
            }
        }
    }

    out
}

fn policy_label(policy: FilterPolicy) -> String {
    match policy {
        FilterPolicy::FiniteLog => "finite-log".to_string(),
        FilterPolicy::AbsoluteCutoff(c) => format!("cutoff od>{c}"),
        FilterPolicy::LogCutoff(c) => format!("log-cutoff ln(od)>{c}"),
    }
}

fn mode_label(mode: RateMode) -> &'static str {
    match mode {
        RateMode::LogSlope => "log-slope",
        RateMode::Specific => "specific rate",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::summarize;
    use crate::domain::{TimeUnit, WellId, WellSeries};
    use crate::error::EstimateError;

    fn tiny_plate() -> Plate {
        Plate {
            time: vec![0.0, 10.0, 20.0],
            wells: vec![WellSeries {
                id: WellId::parse("A1").unwrap(),
                values: vec![0.1, 0.2, 0.4],
            }],
            time_unit: TimeUnit::Minutes,
        }
    }

    #[test]
    fn failed_wells_render_dashes() {
        let outcomes = vec![WellOutcome {
            well: WellId::parse("A1").unwrap(),
            fit: Err(EstimateError::NoExponentialPhase),
        }];

        let table = format_results_table(&outcomes, &tiny_plate());
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with("A1"));
        assert!(row.contains('-'));
        assert!(row.contains("no exponential phase"));
    }

    #[test]
    fn summary_counts_failures_by_kind() {
        let outcomes = vec![
            WellOutcome {
                well: WellId::parse("A1").unwrap(),
                fit: Err(EstimateError::InsufficientData { have: 1, need: 6 }),
            },
            WellOutcome {
                well: WellId::parse("A2").unwrap(),
                fit: Err(EstimateError::NoExponentialPhase),
            },
        ];

        let text = format_run_summary(
            &tiny_plate(),
            &summarize(&outcomes),
            &EstimatorConfig::default(),
        );
        assert!(text.contains("Estimated 0/2 wells"));
        assert!(text.contains("1 insufficient data"));
        assert!(text.contains("1 no exponential phase"));
    }
}
