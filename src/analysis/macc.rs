use float_ord::FloatOrd;
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::problem::{Pool, UnknownVessel, VesselId};
use crate::solution::FleetMetrics;

/// Abatement below this many tonnes CO2eq across all steps counts as no
/// abatement at all.
const ABATEMENT_EPSILON: f64 = 1e-6;

/// One abatement option on the curve.
#[derive(Debug, Clone, Serialize)]
pub struct MaccStep {
    pub name: String,
    /// Emissions avoided relative to the baseline fleet, tonnes CO2eq
    pub abatement: f64,
    /// Extra cost per tonne avoided; `None` when the step does not abate
    pub marginal_cost: Option<f64>,
    /// Running abatement total along the sorted curve; `None` on a
    /// degenerate curve and on non-abating steps
    pub cumulative_abatement: Option<f64>,
}

/// A marginal abatement cost curve over a set of alternative fleets.
#[derive(Debug, Clone, Serialize)]
pub struct MaccCurve {
    pub baseline_cost: f64,
    pub baseline_emissions: f64,
    pub total_abatement: f64,
    /// Set when no step abates anything; the cumulative axis is then
    /// meaningless and omitted
    pub degenerate: bool,
    /// Steps sorted by marginal cost, cheapest abatement first
    pub steps: Vec<MaccStep>,
}

/// Build the curve: each alternative fleet is an abatement option priced
/// by its cost increase per tonne of emissions avoided relative to the
/// baseline fleet.
pub fn build_macc(
    pool: &Pool,
    baseline: &[VesselId],
    alternatives: &[(String, Vec<VesselId>)],
) -> Result<MaccCurve, UnknownVessel> {
    let base = FleetMetrics::of(pool, baseline)?;
    info!(
        "Building abatement curve against a baseline of {} vessels, {} tCO2eq.",
        base.fleet_size, base.total_emissions
    );

    let mut steps: Vec<MaccStep> = alternatives
        .iter()
        .map(|(name, selection)| {
            let metrics = FleetMetrics::of(pool, selection)?;
            let abatement = base.total_emissions - metrics.total_emissions;
            let marginal_cost = (abatement > 0.0)
                .then(|| (metrics.total_cost - base.total_cost) / abatement);
            Ok(MaccStep {
                name: name.clone(),
                abatement,
                marginal_cost,
                cumulative_abatement: None,
            })
        })
        .collect::<Result<_, UnknownVessel>>()?;

    // cheapest abatement first; non-abating steps go last
    steps = steps
        .into_iter()
        .sorted_by_key(|step| {
            (
                step.marginal_cost.is_none(),
                FloatOrd(step.marginal_cost.unwrap_or(f64::INFINITY)),
            )
        })
        .collect();

    let total_abatement: f64 = steps
        .iter()
        .filter(|step| step.abatement > 0.0)
        .map(|step| step.abatement)
        .sum();
    let degenerate = total_abatement <= ABATEMENT_EPSILON;

    if !degenerate {
        let mut running = 0.0;
        for step in &mut steps {
            if step.marginal_cost.is_some() {
                running += step.abatement;
                step.cumulative_abatement = Some(running);
            }
        }
    }

    Ok(MaccCurve {
        baseline_cost: base.total_cost,
        baseline_emissions: base.total_emissions,
        total_abatement,
        degenerate,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::checkpoint_pool;

    #[test]
    fn steps_are_sorted_by_marginal_cost() {
        let pool = checkpoint_pool();
        let baseline = vec![10102950, 10657280, 10791900]; // 1266.12 t
        let alternatives = vec![
            ("clean".to_string(), vec![10522650, 10657280, 10673120]),
            ("mid".to_string(), vec![10657280, 10673120, 10791900]),
        ];
        let curve = build_macc(&pool, &baseline, &alternatives).unwrap();

        assert_eq!(curve.baseline_cost, 3_184_869.0);
        assert!(!curve.degenerate);
        // "mid" abates 470.86 t for 304,852 -> ~647/t
        // "clean" abates 470.99 t for 417,021 -> ~885/t
        assert_eq!(curve.steps[0].name, "mid");
        assert_eq!(curve.steps[1].name, "clean");
        let first = curve.steps[0].marginal_cost.unwrap();
        let second = curve.steps[1].marginal_cost.unwrap();
        assert!(first <= second);

        // cumulative axis accumulates in sorted order
        let c0 = curve.steps[0].cumulative_abatement.unwrap();
        let c1 = curve.steps[1].cumulative_abatement.unwrap();
        assert!((c0 - curve.steps[0].abatement).abs() < 1e-9);
        assert!((c1 - curve.total_abatement).abs() < 1e-9);
    }

    #[test]
    fn non_abating_steps_are_unpriced_and_last() {
        let pool = checkpoint_pool();
        let baseline = vec![10522650, 10657280, 10673120]; // already the cleanest
        let alternatives = vec![
            ("dirtier".to_string(), vec![10102950, 10657280, 10791900]),
            ("cleaner".to_string(), vec![10657280, 10673120]),
        ];
        let curve = build_macc(&pool, &baseline, &alternatives).unwrap();

        assert_eq!(curve.steps.last().unwrap().name, "dirtier");
        assert!(curve.steps.last().unwrap().marginal_cost.is_none());
        assert!(curve.steps.last().unwrap().cumulative_abatement.is_none());
        assert!(curve.steps[0].marginal_cost.is_some());
    }

    #[test]
    fn all_identical_fleets_degenerate() {
        let pool = checkpoint_pool();
        let baseline = vec![10102950, 10657280, 10791900];
        let alternatives = vec![("same".to_string(), baseline.clone())];
        let curve = build_macc(&pool, &baseline, &alternatives).unwrap();

        assert!(curve.degenerate);
        assert_eq!(curve.total_abatement, 0.0);
        assert!(curve.steps[0].marginal_cost.is_none());
        assert!(curve.steps[0].cumulative_abatement.is_none());
    }

    #[test]
    fn unknown_fleet_member_is_an_error() {
        let pool = checkpoint_pool();
        let baseline = vec![10102950];
        let alternatives = vec![("bad".to_string(), vec![123])];
        assert!(build_macc(&pool, &baseline, &alternatives).is_err());
    }
}
