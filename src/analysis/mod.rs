use derive_more::Display;
use log::info;
use serde::Serialize;

use crate::models::fleet::{FleetModel, SelectRequest};
use crate::models::ModelError;
use crate::problem::{Pool, PoolConstructionError, UnknownVessel, VesselId};
use crate::solution::{fuel_type_counts, FleetMetrics, FleetSelection};

pub mod macc;
pub mod pareto;
pub mod shadow;
pub mod sweep;

#[derive(Debug, Display)]
pub enum AnalysisError {
    #[display(fmt = "{}", _0)]
    Model(ModelError),
    #[display(fmt = "cost adjustment produced an invalid pool: {}", _0)]
    AdjustedPool(PoolConstructionError),
    #[display(fmt = "{}", _0)]
    UnknownVessel(UnknownVessel),
}

impl std::error::Error for AnalysisError {}

impl From<ModelError> for AnalysisError {
    fn from(e: ModelError) -> AnalysisError {
        AnalysisError::Model(e)
    }
}

impl From<PoolConstructionError> for AnalysisError {
    fn from(e: PoolConstructionError) -> AnalysisError {
        AnalysisError::AdjustedPool(e)
    }
}

impl From<UnknownVessel> for AnalysisError {
    fn from(e: UnknownVessel) -> AnalysisError {
        AnalysisError::UnknownVessel(e)
    }
}

/// A solved fleet together with the aggregates the analyses report.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub selected: Vec<VesselId>,
    pub metrics: FleetMetrics,
    pub fuel_type_counts: Vec<(String, usize)>,
}

impl FleetReport {
    pub fn of(pool: &Pool, selection: &FleetSelection) -> Result<FleetReport, UnknownVessel> {
        Ok(FleetReport {
            selected: selection.vessels().to_vec(),
            metrics: FleetMetrics::of(pool, selection.vessels())?,
            fuel_type_counts: fuel_type_counts(pool, selection.vessels())?,
        })
    }
}

/// What enforcing fuel diversity costs, compared to the unconstrained
/// optimum for the same demand and safety threshold.
#[derive(Debug, Clone, Serialize)]
pub struct DiversityWhatIf {
    pub with_diversity: Option<FleetReport>,
    pub without_diversity: Option<FleetReport>,
    /// Diverse cost minus unconstrained cost; `None` unless both solves
    /// are feasible
    pub cost_of_diversity: Option<f64>,
    pub fleet_size_difference: Option<i64>,
    /// Fuel types present only when diversity is enforced
    pub fuel_types_lost_without: Vec<String>,
}

/// Solve the same request with and without the fuel diversity constraint
/// and report what the constraint buys and costs.
pub fn run_diversity_whatif(
    pool: &Pool,
    demand: f64,
    min_avg_safety: f64,
) -> Result<DiversityWhatIf, AnalysisError> {
    info!("Running fuel diversity what-if at demand {demand}, safety {min_avg_safety}.");

    let request = |require_all_fuel_types| SelectRequest {
        demand,
        min_avg_safety,
        require_all_fuel_types,
        emissions_cap: None,
    };

    let diverse = FleetModel::select(pool, &request(true))?;
    let unconstrained = FleetModel::select(pool, &request(false))?;

    let with_diversity = diverse
        .as_ref()
        .map(|s| FleetReport::of(pool, s))
        .transpose()?;
    let without_diversity = unconstrained
        .as_ref()
        .map(|s| FleetReport::of(pool, s))
        .transpose()?;

    let (cost_of_diversity, fleet_size_difference, fuel_types_lost_without) =
        match (&with_diversity, &without_diversity) {
            (Some(with), Some(without)) => {
                let lost = with
                    .fuel_type_counts
                    .iter()
                    .filter(|(fuel, _)| {
                        !without.fuel_type_counts.iter().any(|(f, _)| f == fuel)
                    })
                    .map(|(fuel, _)| fuel.clone())
                    .collect();
                (
                    Some(with.metrics.total_cost - without.metrics.total_cost),
                    Some(with.metrics.fleet_size as i64 - without.metrics.fleet_size as i64),
                    lost,
                )
            }
            _ => (None, None, Vec::new()),
        };

    Ok(DiversityWhatIf {
        with_diversity,
        without_diversity,
        cost_of_diversity,
        fleet_size_difference,
        fuel_types_lost_without,
    })
}

/// Per-unit efficiency figures of a fixed fleet. Every field is `None` for
/// an empty selection.
#[derive(Debug, Clone, Serialize)]
pub struct FleetEfficiency {
    pub cost_per_capacity: Option<f64>,
    pub cost_per_vessel: Option<f64>,
    pub capacity_per_vessel: Option<f64>,
    pub emissions_per_capacity: Option<f64>,
    /// Demand over capacity: how much of the chartered capacity the cargo
    /// actually uses
    pub capacity_utilization: Option<f64>,
}

pub fn fleet_efficiency(
    pool: &Pool,
    selection: &[VesselId],
    demand: f64,
) -> Result<FleetEfficiency, UnknownVessel> {
    let metrics = FleetMetrics::of(pool, selection)?;

    if metrics.fleet_size == 0 {
        return Ok(FleetEfficiency {
            cost_per_capacity: None,
            cost_per_vessel: None,
            capacity_per_vessel: None,
            emissions_per_capacity: None,
            capacity_utilization: None,
        });
    }

    let n = metrics.fleet_size as f64;
    Ok(FleetEfficiency {
        cost_per_capacity: Some(metrics.total_cost / metrics.total_capacity),
        cost_per_vessel: Some(metrics.total_cost / n),
        capacity_per_vessel: Some(metrics.total_capacity / n),
        emissions_per_capacity: Some(metrics.total_emissions / metrics.total_capacity),
        capacity_utilization: Some(demand / metrics.total_capacity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::checkpoint_pool;

    #[test]
    fn diversity_premium_on_the_checkpoint_pool() {
        let pool = checkpoint_pool();
        let whatif = run_diversity_whatif(&pool, 500_000.0, 2.5).unwrap();

        let with = whatif.with_diversity.expect("feasible");
        let without = whatif.without_diversity.expect("feasible");
        // diversity forces all five fuel types, i.e. the whole pool
        assert_eq!(with.metrics.fleet_size, 5);
        assert_eq!(without.metrics.fleet_size, 3);
        assert_eq!(
            whatif.cost_of_diversity,
            Some(5_526_543.0 - 3_110_193.0)
        );
        assert_eq!(whatif.fleet_size_difference, Some(2));
        let mut lost = whatif.fuel_types_lost_without.clone();
        lost.sort();
        assert_eq!(lost, vec!["Ammonia".to_string(), "Methanol".to_string()]);
    }

    #[test]
    fn infeasible_legs_yield_no_difference() {
        let pool = checkpoint_pool();
        let whatif = run_diversity_whatif(&pool, 2_000_000.0, 3.0).unwrap();
        assert!(whatif.with_diversity.is_none());
        assert!(whatif.without_diversity.is_none());
        assert!(whatif.cost_of_diversity.is_none());
        assert!(whatif.fuel_types_lost_without.is_empty());
    }

    #[test]
    fn efficiency_arithmetic() {
        let pool = checkpoint_pool();
        let ids = [10102950, 10657280, 10791900];
        let eff = fleet_efficiency(&pool, &ids, 500_000.0).unwrap();

        let capacity = 175_108.0 + 206_331.0 + 179_700.0;
        let cost = 3_184_869.0;
        assert_eq!(eff.cost_per_capacity, Some(cost / capacity));
        assert_eq!(eff.cost_per_vessel, Some(cost / 3.0));
        assert_eq!(eff.capacity_per_vessel, Some(capacity / 3.0));
        assert_eq!(eff.capacity_utilization, Some(500_000.0 / capacity));
    }

    #[test]
    fn empty_fleet_has_no_efficiency_figures() {
        let pool = checkpoint_pool();
        let eff = fleet_efficiency(&pool, &[], 0.0).unwrap();
        assert!(eff.cost_per_capacity.is_none());
        assert!(eff.capacity_utilization.is_none());
    }
}
