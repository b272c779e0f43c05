use good_lp::{default_solver, variables, Expression, ResolutionError, SolverModel};
use log::{debug, info};

use crate::models::fleet::sets_and_parameters::{Parameters, Sets};
use crate::models::utils::{binary_per_vessel, chosen_indices, weighted_sum};
use crate::models::ModelError;
use crate::problem::Pool;
use crate::solution::FleetSelection;
use crate::validate::validate_fleet;

/// What the caller asks of a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectRequest {
    /// Cargo demand the fleet must cover, in deadweight tonnes
    pub demand: f64,
    /// Minimum average fleet safety rating
    pub min_avg_safety: f64,
    /// Whether every fuel type in the pool must be represented
    pub require_all_fuel_types: bool,
    /// Optional hard cap on total fleet emissions
    pub emissions_cap: Option<f64>,
}

enum Objective {
    Cost,
    Emissions,
}

/// The exact binary selection model: pick a subset of the pool at minimum
/// total cost subject to capacity, average safety, and optionally fuel
/// diversity and an emissions cap.
pub struct FleetModel;

impl FleetModel {
    /// Minimum-cost selection. `Ok(None)` means the request is infeasible.
    pub fn select(
        pool: &Pool,
        request: &SelectRequest,
    ) -> Result<Option<FleetSelection>, ModelError> {
        Self::solve(pool, request, Objective::Cost)
    }

    /// Minimum-emissions selection under the same capacity, safety, and
    /// diversity constraints. Used to anchor the attainable low end of the
    /// cost/emissions trade-off.
    pub fn select_min_emissions(
        pool: &Pool,
        request: &SelectRequest,
    ) -> Result<Option<FleetSelection>, ModelError> {
        Self::solve(pool, request, Objective::Emissions)
    }

    fn solve(
        pool: &Pool,
        request: &SelectRequest,
        objective: Objective,
    ) -> Result<Option<FleetSelection>, ModelError> {
        // An empty pool leaves nothing to choose from. The empty fleet is
        // still valid when there is no demand to cover.
        if pool.is_empty() {
            let feasible = request.demand <= 0.0;
            return Ok(feasible.then(|| FleetSelection::new(Vec::new(), 0.0)));
        }

        let sets = Sets::new(pool);
        let parameters = Parameters::new(pool, &sets, request.min_avg_safety);

        info!(
            "Building fleet selection model over {} vessels and {} fuel types.",
            sets.V.len(),
            sets.F.len()
        );

        let mut vars = variables!();
        let x = binary_per_vessel(&mut vars, sets.V.len());

        let weights = match objective {
            Objective::Cost => &parameters.cost,
            Objective::Emissions => &parameters.emissions,
        };

        let mut model = vars
            .minimise(weighted_sum(&x, weights))
            .using(default_solver);

        // C1: cover the cargo demand
        model.add_constraint(weighted_sum(&x, &parameters.capacity).geq(request.demand));
        // C2: linearized average safety requirement
        model.add_constraint(weighted_sum(&x, &parameters.safety_delta).geq(0.0));
        // C3: at least one vessel per fuel type
        if request.require_all_fuel_types {
            for (f, fuel) in sets.F.iter().enumerate() {
                let group = &parameters.vessels_by_fuel[f];
                debug!("fuel type {fuel}: {} candidate vessels", group.len());
                let picks = group
                    .iter()
                    .fold(Expression::from(0.0), |acc, &v| acc + x[v]);
                model.add_constraint(picks.geq(1.0));
            }
        }
        // C4: emissions cap
        if let Some(cap) = request.emissions_cap {
            model.add_constraint(weighted_sum(&x, &parameters.emissions).leq(cap));
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            // any non-optimal terminal status counts as "no fleet"
            Err(ResolutionError::Infeasible | ResolutionError::Unbounded) => {
                debug!("request {request:?} is infeasible");
                return Ok(None);
            }
            Err(other) => return Err(ModelError::Solver(other.to_string())),
        };

        let chosen = chosen_indices(&solution, &x);
        // Recompute the objective from the chosen set so that identical
        // requests always report the identical value.
        let objective_value = chosen.iter().map(|&v| weights[v]).sum();
        let ids = chosen.iter().map(|&v| pool.vessels()[v].id()).collect();
        let selection = FleetSelection::new(ids, objective_value);

        Self::check_invariants(pool, request, &selection)?;
        Ok(Some(selection))
    }

    /// An optimal solution that violates its own constraints means the
    /// formulation is broken, which must never pass silently.
    fn check_invariants(
        pool: &Pool,
        request: &SelectRequest,
        selection: &FleetSelection,
    ) -> Result<(), ModelError> {
        let (ok, violations) = validate_fleet(
            pool,
            selection.vessels(),
            request.demand,
            request.min_avg_safety,
            request.require_all_fuel_types,
        )
        .map_err(|e| ModelError::InvariantViolation(e.to_string()))?;

        match ok {
            true => Ok(()),
            false => Err(ModelError::InvariantViolation(violations.join("; "))),
        }
    }
}
