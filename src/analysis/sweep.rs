use log::{debug, info};
use serde::Serialize;

use crate::analysis::{AnalysisError, FleetReport};
use crate::cost::adjust_costs;
use crate::models::fleet::{FleetModel, SelectRequest};
use crate::problem::{Pool, UnknownVessel, VesselId};

/// One point of the safety-threshold sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SafetySweepPoint {
    pub threshold: f64,
    pub feasible: bool,
    pub report: Option<FleetReport>,
}

/// Re-optimize the fleet for each average-safety threshold. Infeasible
/// thresholds are reported in place so the caller sees where the
/// requirement becomes unattainable.
pub fn run_safety_sweep(
    pool: &Pool,
    thresholds: &[f64],
    demand: f64,
    require_all_fuel_types: bool,
) -> Result<Vec<SafetySweepPoint>, AnalysisError> {
    info!("Running safety sweep over {} thresholds.", thresholds.len());

    thresholds
        .iter()
        .map(|&threshold| {
            let request = SelectRequest {
                demand,
                min_avg_safety: threshold,
                require_all_fuel_types,
                emissions_cap: None,
            };
            let outcome = FleetModel::select(pool, &request)?;
            debug!(
                "threshold {threshold}: {}",
                if outcome.is_some() { "feasible" } else { "infeasible" }
            );
            let report = outcome
                .as_ref()
                .map(|s| FleetReport::of(pool, s))
                .transpose()?;
            Ok(SafetySweepPoint {
                threshold,
                feasible: report.is_some(),
                report,
            })
        })
        .collect()
}

/// One point of the re-optimizing carbon price sweep.
#[derive(Debug, Clone, Serialize)]
pub struct CarbonSweepPoint {
    pub carbon_price: f64,
    pub feasible: bool,
    pub report: Option<FleetReport>,
}

/// Re-optimize the fleet at each carbon price. Every point solves against
/// a freshly re-priced copy of the pool; the input pool is never touched.
pub fn run_carbon_price_sweep(
    pool: &Pool,
    prices: &[f64],
    demand: f64,
    min_avg_safety: f64,
    require_all_fuel_types: bool,
) -> Result<Vec<CarbonSweepPoint>, AnalysisError> {
    info!("Running carbon price sweep over {} prices.", prices.len());

    let request = SelectRequest {
        demand,
        min_avg_safety,
        require_all_fuel_types,
        emissions_cap: None,
    };

    prices
        .iter()
        .map(|&carbon_price| {
            let repriced = adjust_costs(pool, carbon_price)?;
            let outcome = FleetModel::select(&repriced, &request)?;
            let report = outcome
                .as_ref()
                .map(|s| FleetReport::of(&repriced, s))
                .transpose()?;
            Ok(CarbonSweepPoint {
                carbon_price,
                feasible: report.is_some(),
                report,
            })
        })
        .collect()
}

/// A fixed fleet held constant while the carbon price moves.
#[derive(Debug, Clone, Serialize)]
pub struct FixedFleetPoint {
    pub carbon_price: f64,
    pub total_cost: f64,
    pub total_emissions: f64,
}

/// Evaluate one fixed selection at each carbon price, without
/// re-optimizing. Shows the exposure of a committed fleet to carbon price
/// movements.
pub fn evaluate_fleet_at_prices(
    pool: &Pool,
    prices: &[f64],
    selection: &[VesselId],
) -> Result<Vec<FixedFleetPoint>, UnknownVessel> {
    let vessels = pool.subset(selection)?;
    let total_emissions: f64 = vessels.iter().map(|v| v.emissions()).sum();

    Ok(prices
        .iter()
        .map(|&carbon_price| FixedFleetPoint {
            carbon_price,
            total_cost: vessels
                .iter()
                .map(|v| v.cost_at_carbon_price(carbon_price))
                .sum(),
            total_emissions,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::checkpoint_pool;

    #[test]
    fn stricter_thresholds_never_get_cheaper() {
        let pool = checkpoint_pool();
        let thresholds = [1.0, 2.0, 3.0, 3.5];
        let points = run_safety_sweep(&pool, &thresholds, 500_000.0, false).unwrap();

        assert_eq!(points.len(), 4);
        let costs: Vec<f64> = points
            .iter()
            .map(|p| p.report.as_ref().expect("feasible").metrics.total_cost)
            .collect();
        for pair in costs.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        // every solved fleet actually meets its threshold
        for point in &points {
            let report = point.report.as_ref().expect("feasible");
            assert!(report.metrics.mean_safety >= point.threshold);
        }
    }

    #[test]
    fn infeasible_thresholds_are_reported_in_place() {
        let pool = checkpoint_pool();
        let points = run_safety_sweep(&pool, &[3.0, 4.5], 500_000.0, false).unwrap();
        assert!(points[0].feasible);
        assert!(!points[1].feasible);
        assert!(points[1].report.is_none());
        assert_eq!(points[1].threshold, 4.5);
    }

    #[test]
    fn carbon_sweep_reprices_but_does_not_mutate() {
        let pool = checkpoint_pool();
        let prices = [0.0, 80.0, 160.0, 240.0];
        let points =
            run_carbon_price_sweep(&pool, &prices, 500_000.0, 3.0, false).unwrap();

        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.feasible));
        // at the embedded price the sweep reproduces the base solve
        let at_base = points[1].report.as_ref().unwrap();
        assert_eq!(at_base.selected, vec![10102950, 10657280, 10791900]);
        // the input pool still carries its original costs
        assert_eq!(pool.vessels()[0].cost(), 880_688.0);
    }

    #[test]
    fn higher_carbon_prices_push_toward_cleaner_fleets() {
        let pool = checkpoint_pool();
        let points =
            run_carbon_price_sweep(&pool, &[80.0, 2_000.0], 500_000.0, 3.0, false).unwrap();
        let base = points[0].report.as_ref().unwrap();
        let expensive = points[1].report.as_ref().unwrap();
        assert!(expensive.metrics.total_emissions <= base.metrics.total_emissions);
    }

    #[test]
    fn fixed_fleet_cost_is_linear_in_the_price() {
        let pool = checkpoint_pool();
        let ids = [10102950, 10657280, 10791900];
        let points = evaluate_fleet_at_prices(&pool, &[0.0, 100.0, 200.0], &ids).unwrap();

        let emissions = 574.53 + 143.08 + 548.51;
        assert!((points[0].total_emissions - emissions).abs() < 1e-9);
        let slope_a = points[1].total_cost - points[0].total_cost;
        let slope_b = points[2].total_cost - points[1].total_cost;
        assert!((slope_a - emissions * 100.0).abs() < 1e-6);
        assert!((slope_a - slope_b).abs() < 1e-6);
    }
}
