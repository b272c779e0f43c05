use log::info;
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::models::fleet::{FleetModel, SelectRequest};
use crate::problem::Pool;

/// Relative demand bump used for the capacity shadow price.
const DEMAND_STEP_FRACTION: f64 = 0.01;
/// Absolute bump of the average-safety threshold.
const SAFETY_STEP: f64 = 0.1;

/// One finite-perturbation leg: re-solve with a slightly harder constraint
/// and price the difference.
#[derive(Debug, Clone, Serialize)]
pub struct ShadowPriceLeg {
    /// Size of the perturbation applied to the constraint
    pub perturbation: f64,
    pub perturbed_cost: Option<f64>,
    pub perturbed_fleet_size: Option<usize>,
    /// Cost increase per unit of perturbation; `None` when the perturbed
    /// problem is infeasible or the perturbation is degenerate
    pub shadow_price: Option<f64>,
}

/// Finite-difference shadow prices of the demand and safety constraints.
#[derive(Debug, Clone, Serialize)]
pub struct ShadowPrices {
    pub demand: f64,
    pub safety_threshold: f64,
    pub base_cost: Option<f64>,
    pub base_fleet_size: Option<usize>,
    pub capacity: ShadowPriceLeg,
    pub safety: ShadowPriceLeg,
}

/// Approximate the marginal cost of the two binding requirements by
/// re-solving with demand bumped 1% and the safety threshold bumped 0.1.
///
/// Because the selection variables are binary, these are finite-difference
/// prices, not LP duals: they report the actual cost of the next feasible
/// fleet, which is what a charterer pays.
pub fn compute_shadow_prices(
    pool: &Pool,
    demand: f64,
    safety_threshold: f64,
    require_all_fuel_types: bool,
) -> Result<ShadowPrices, AnalysisError> {
    info!("Computing shadow prices at demand {demand}, safety {safety_threshold}.");

    let request = |demand, min_avg_safety| SelectRequest {
        demand,
        min_avg_safety,
        require_all_fuel_types,
        emissions_cap: None,
    };

    let base = FleetModel::select(pool, &request(demand, safety_threshold))?;
    let (base_cost, base_fleet_size) = match &base {
        Some(selection) => (Some(selection.objective()), Some(selection.len())),
        None => (None, None),
    };

    let empty_leg = |perturbation| ShadowPriceLeg {
        perturbation,
        perturbed_cost: None,
        perturbed_fleet_size: None,
        shadow_price: None,
    };

    let demand_step = demand * DEMAND_STEP_FRACTION;
    let (capacity, safety) = match base_cost {
        None => (empty_leg(demand_step), empty_leg(SAFETY_STEP)),
        Some(base_cost) => {
            let capacity = match demand_step > 0.0 {
                // a zero demand has a zero-size bump, nothing to price
                false => empty_leg(demand_step),
                true => {
                    let outcome =
                        FleetModel::select(pool, &request(demand + demand_step, safety_threshold))?;
                    leg(outcome, base_cost, demand_step)
                }
            };
            let outcome =
                FleetModel::select(pool, &request(demand, safety_threshold + SAFETY_STEP))?;
            let safety = leg(outcome, base_cost, SAFETY_STEP);
            (capacity, safety)
        }
    };

    Ok(ShadowPrices {
        demand,
        safety_threshold,
        base_cost,
        base_fleet_size,
        capacity,
        safety,
    })
}

fn leg(
    outcome: Option<crate::solution::FleetSelection>,
    base_cost: f64,
    perturbation: f64,
) -> ShadowPriceLeg {
    match outcome {
        None => ShadowPriceLeg {
            perturbation,
            perturbed_cost: None,
            perturbed_fleet_size: None,
            shadow_price: None,
        },
        Some(selection) => ShadowPriceLeg {
            perturbation,
            perturbed_cost: Some(selection.objective()),
            perturbed_fleet_size: Some(selection.len()),
            shadow_price: Some((selection.objective() - base_cost) / perturbation),
        },
    }
}
