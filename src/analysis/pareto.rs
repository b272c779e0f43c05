use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::analysis::{AnalysisError, FleetReport};
use crate::models::fleet::{FleetModel, SelectRequest};
use crate::problem::Pool;

/// One point on the cost/emissions frontier.
#[derive(Debug, Clone, Serialize)]
pub struct ParetoPoint {
    /// The emissions cap this point was solved under
    pub emissions_cap: f64,
    pub feasible: bool,
    pub report: Option<FleetReport>,
    /// Marginal cost of abatement between this point and the previous
    /// feasible one, in USD per tonne CO2eq. `None` for the first feasible
    /// point and wherever emissions did not actually drop.
    pub shadow_carbon_price: Option<f64>,
}

/// Trace the cost/emissions trade-off by tightening an emissions cap from
/// the unconstrained optimum's emissions down to the attainable minimum.
///
/// The implied (shadow) carbon price between consecutive feasible points is
/// the extra cost paid per tonne of emissions actually avoided.
pub fn run_pareto_sweep(
    pool: &Pool,
    n_points: usize,
    demand: f64,
    min_avg_safety: f64,
    require_all_fuel_types: bool,
) -> Result<Vec<ParetoPoint>, AnalysisError> {
    if n_points == 0 {
        return Ok(Vec::new());
    }

    let request = |emissions_cap| SelectRequest {
        demand,
        min_avg_safety,
        require_all_fuel_types,
        emissions_cap,
    };

    // The frontier endpoints: emissions of the cost-optimal fleet, and the
    // least emissions any feasible fleet can have.
    let base = match FleetModel::select(pool, &request(None))? {
        Some(selection) => selection,
        None => {
            info!("base request is infeasible, the frontier is empty");
            return Ok(Vec::new());
        }
    };
    let emissions_max = FleetReport::of(pool, &base)?.metrics.total_emissions;

    let cleanest = FleetModel::select_min_emissions(pool, &request(None))?
        .map(|selection| selection.objective())
        .unwrap_or(emissions_max);
    let emissions_min = cleanest.min(emissions_max);

    info!(
        "Tracing the frontier from {emissions_max} down to {emissions_min} tCO2eq over {n_points} points."
    );

    let caps: Vec<f64> = match n_points {
        1 => vec![emissions_max],
        n => {
            let step = (emissions_max - emissions_min) / (n - 1) as f64;
            (0..n).map(|i| emissions_max - step * i as f64).collect()
        }
    };

    let mut points = Vec::with_capacity(caps.len());
    for cap in caps {
        let outcome = FleetModel::select(pool, &request(Some(cap)))?;
        debug!(
            "cap {cap}: {}",
            if outcome.is_some() { "feasible" } else { "infeasible" }
        );
        let report = outcome
            .as_ref()
            .map(|s| FleetReport::of(pool, s))
            .transpose()?;
        points.push(ParetoPoint {
            emissions_cap: cap,
            feasible: report.is_some(),
            report,
            shadow_carbon_price: None,
        });
    }

    // Implied carbon price between consecutive feasible points.
    let feasible: Vec<(usize, f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            p.report
                .as_ref()
                .map(|r| (i, r.metrics.total_emissions, r.metrics.total_cost))
        })
        .collect();
    for ((_, prev_emissions, prev_cost), (i, emissions, cost)) in
        feasible.into_iter().tuple_windows()
    {
        let reduction = prev_emissions - emissions;
        if reduction > 0.0 {
            points[i].shadow_carbon_price = Some((cost - prev_cost) / reduction);
        }
    }

    Ok(points)
}
