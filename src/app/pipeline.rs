//! Shared batch pipeline used by the `fit` and `sample` front-ends.
//!
//! Iterates the plate's validated well list, runs the estimator per well
//! (in parallel — wells are independent and results are merged by id), and
//! collects one outcome per well. A failed well becomes a null row; it never
//! aborts the batch.

use rayon::prelude::*;

use crate::domain::{EstimatorConfig, GrowthEstimate, Plate, WellFit, WellId};
use crate::error::EstimateError;
use crate::fit::estimate_well;

/// One well's outcome: a full fit, or the reason there is none.
#[derive(Debug, Clone)]
pub struct WellOutcome {
    pub well: WellId,
    pub fit: Result<WellFit, EstimateError>,
}

impl WellOutcome {
    /// The persisted estimate, if the well produced one.
    pub fn estimate(&self) -> Option<&GrowthEstimate> {
        self.fit.as_ref().ok().map(|f| &f.estimate)
    }
}

/// Aggregate counts for the run summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSummary {
    pub wells: usize,
    pub estimated: usize,
    pub insufficient_data: usize,
    pub no_exponential_phase: usize,
    pub malformed: usize,
}

/// Estimate every well of a plate.
///
/// Outcomes come back in plate order; nothing depends on execution order.
pub fn run_plate(plate: &Plate, config: &EstimatorConfig) -> Vec<WellOutcome> {
    plate
        .wells
        .par_iter()
        .map(|well| WellOutcome {
            well: well.id.clone(),
            fit: estimate_well(&plate.time, &well.values, config),
        })
        .collect()
}

pub fn summarize(outcomes: &[WellOutcome]) -> BatchSummary {
    let mut summary = BatchSummary {
        wells: outcomes.len(),
        ..BatchSummary::default()
    };
    for outcome in outcomes {
        match &outcome.fit {
            Ok(_) => summary.estimated += 1,
            Err(EstimateError::InsufficientData { .. }) => summary.insufficient_data += 1,
            Err(EstimateError::NoExponentialPhase) => summary.no_exponential_phase += 1,
            Err(EstimateError::MalformedSeries(_)) => summary.malformed += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterPolicy, TimeUnit, WellSeries};

    fn plate_with(wells: Vec<(&str, Vec<f64>)>) -> Plate {
        let time: Vec<f64> = (0..11).map(|i| i as f64 * 10.0).collect();
        Plate {
            time,
            wells: wells
                .into_iter()
                .map(|(id, values)| WellSeries {
                    id: WellId::parse(id).unwrap(),
                    values,
                })
                .collect(),
            time_unit: TimeUnit::Minutes,
        }
    }

    #[test]
    fn one_bad_well_does_not_block_the_rest() {
        let growing: Vec<f64> = (0..11).map(|i| (0.05 * i as f64 * 10.0).exp()).collect();
        let dead = vec![0.01; 11];

        let plate = plate_with(vec![("A1", growing.clone()), ("A2", dead), ("A3", growing)]);
        let config = EstimatorConfig {
            policy: FilterPolicy::AbsoluteCutoff(0.5),
            ..EstimatorConfig::default()
        };

        let outcomes = run_plate(&plate, &config);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].estimate().is_some());
        assert!(matches!(
            outcomes[1].fit,
            Err(EstimateError::InsufficientData { .. })
        ));
        assert!(outcomes[2].estimate().is_some());

        let summary = summarize(&outcomes);
        assert_eq!(summary.wells, 3);
        assert_eq!(summary.estimated, 2);
        assert_eq!(summary.insufficient_data, 1);
    }

    #[test]
    fn outcomes_preserve_plate_order() {
        let growing: Vec<f64> = (0..11).map(|i| (0.04 * i as f64 * 10.0).exp()).collect();
        let plate = plate_with(vec![
            ("B1", growing.clone()),
            ("B2", growing.clone()),
            ("B3", growing),
        ]);

        let outcomes = run_plate(&plate, &EstimatorConfig::default());
        let ids: Vec<&str> = outcomes.iter().map(|o| o.well.as_str()).collect();
        assert_eq!(ids, vec!["B1", "B2", "B3"]);
    }
}
