use float_ord::FloatOrd;
use good_lp::{
    default_solver, variable, variables, Expression, ResolutionError, Solution, SolverModel,
};
use log::{debug, info};

use crate::models::fleet::sets_and_parameters::{Parameters, Sets};
use crate::models::utils::{binary_per_vessel, chosen_indices, weighted_sum};
use crate::models::ModelError;
use crate::problem::Pool;
use crate::scenario::{cost_matrix, fleet_costs_by_scenario, Scenario};
use crate::solution::FleetSelection;
use crate::validate::validate_fleet;

/// Allowed absolute gap between the epigraph variable and the realized
/// worst-case cost of the returned fleet.
const WORST_CASE_TOLERANCE: f64 = 1.0;

/// The min-max counterpart of the exact selector: one fleet that minimizes
/// the worst cost it can incur across a set of scenarios, while meeting the
/// strictest safety requirement among them.
pub struct RobustModel;

impl RobustModel {
    /// `Ok(None)` means no single fleet is feasible in every scenario. An
    /// empty scenario set is malformed input, not infeasibility.
    pub fn select(
        pool: &Pool,
        scenarios: &[Scenario],
        demand: f64,
        require_all_fuel_types: bool,
    ) -> Result<Option<(FleetSelection, f64)>, ModelError> {
        if scenarios.is_empty() {
            return Err(ModelError::EmptyScenarioSet);
        }

        let strictest_safety = scenarios
            .iter()
            .map(|s| s.min_avg_safety)
            .fold(f64::NEG_INFINITY, f64::max);

        if pool.is_empty() {
            let feasible = demand <= 0.0;
            return Ok(feasible.then(|| (FleetSelection::new(Vec::new(), 0.0), 0.0)));
        }

        let sets = Sets::new(pool);
        let parameters = Parameters::new(pool, &sets, strictest_safety);
        let matrix = cost_matrix(pool, scenarios);

        info!(
            "Building robust fleet model over {} vessels and {} scenarios.",
            sets.V.len(),
            scenarios.len()
        );

        let mut vars = variables!();
        let x = binary_per_vessel(&mut vars, sets.V.len());
        // epigraph variable: the worst cost across scenarios
        let z = vars.add(variable().min(0.0).name("Z"));

        let mut model = vars.minimise(z).using(default_solver);

        // the fleet cost in every scenario stays below Z
        for (s, scenario) in scenarios.iter().enumerate() {
            debug!(
                "scenario {}: carbon price {}, safety {}",
                scenario.name, scenario.carbon_price, scenario.min_avg_safety
            );
            let scenario_cost = x
                .iter()
                .enumerate()
                .fold(Expression::from(0.0), |acc, (v, &var)| {
                    acc + matrix[[v, s]] * var
                });
            model.add_constraint((scenario_cost - z).leq(0.0));
        }

        model.add_constraint(weighted_sum(&x, &parameters.capacity).geq(demand));
        model.add_constraint(weighted_sum(&x, &parameters.safety_delta).geq(0.0));
        if require_all_fuel_types {
            for group in &parameters.vessels_by_fuel {
                let picks = group
                    .iter()
                    .fold(Expression::from(0.0), |acc, &v| acc + x[v]);
                model.add_constraint(picks.geq(1.0));
            }
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible | ResolutionError::Unbounded) => {
                debug!("no fleet is feasible across all {} scenarios", scenarios.len());
                return Ok(None);
            }
            Err(other) => return Err(ModelError::Solver(other.to_string())),
        };

        let chosen = chosen_indices(&solution, &x);
        let ids: Vec<_> = chosen.iter().map(|&v| pool.vessels()[v].id()).collect();
        let z_value = solution.value(z);

        let realized = fleet_costs_by_scenario(pool, scenarios, &ids)
            .map_err(|e| ModelError::InvariantViolation(e.to_string()))?;
        let worst_case = realized
            .iter()
            .copied()
            .map(FloatOrd)
            .max()
            .map(|FloatOrd(cost)| cost)
            .unwrap_or(0.0);

        if (worst_case - z_value).abs() > WORST_CASE_TOLERANCE {
            return Err(ModelError::InvariantViolation(format!(
                "worst-case cost {worst_case} disagrees with the epigraph value {z_value}"
            )));
        }

        let (ok, violations) = validate_fleet(
            pool,
            &ids,
            demand,
            strictest_safety,
            require_all_fuel_types,
        )
        .map_err(|e| ModelError::InvariantViolation(e.to_string()))?;
        if !ok {
            return Err(ModelError::InvariantViolation(violations.join("; ")));
        }

        Ok(Some((FleetSelection::new(ids, worst_case), worst_case)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::default_scenarios;
    use crate::test_fixtures::{checkpoint_pool, ALL_IDS};

    #[test]
    fn forced_full_fleet_prices_at_the_worst_scenario() {
        let pool = checkpoint_pool();
        let scenarios = vec![
            Scenario::new("base", 80.0, 1.0),
            Scenario::new("high_carbon", 160.0, 1.0),
        ];
        // demand pins the fleet to all five vessels
        let (selection, worst_case) =
            RobustModel::select(&pool, &scenarios, 855_421.0, false)
                .unwrap()
                .expect("feasible");
        assert_eq!(selection.vessels(), &ALL_IDS);

        let total_emissions = 574.53 + 143.08 + 548.51 + 548.38 + 103.67;
        let expected = 5_526_543.0 + total_emissions * 80.0;
        assert!((worst_case - expected).abs() <= WORST_CASE_TOLERANCE);
    }

    #[test]
    fn strictest_scenario_safety_binds() {
        let pool = checkpoint_pool();
        let scenarios = default_scenarios(3.0);
        let (selection, _) = RobustModel::select(&pool, &scenarios, 500_000.0, false)
            .unwrap()
            .expect("feasible");
        let vessels = pool.subset(selection.vessels()).unwrap();
        let mean = vessels
            .iter()
            .map(|v| v.safety_rating() as f64)
            .sum::<f64>()
            / vessels.len() as f64;
        assert!(mean >= 3.5);
    }

    #[test]
    fn infeasible_across_scenarios_is_none() {
        let pool = checkpoint_pool();
        let scenarios = default_scenarios(4.6);
        let outcome = RobustModel::select(&pool, &scenarios, 500_000.0, false).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn empty_scenario_set_is_a_hard_error() {
        let pool = checkpoint_pool();
        let err = RobustModel::select(&pool, &[], 500_000.0, false).unwrap_err();
        assert!(matches!(err, ModelError::EmptyScenarioSet));
    }

    #[test]
    fn single_scenario_reduces_to_the_exact_model() {
        let pool = checkpoint_pool();
        let scenarios = vec![Scenario::new("base", 80.0, 3.0)];
        let (selection, worst_case) = RobustModel::select(&pool, &scenarios, 500_000.0, false)
            .unwrap()
            .expect("feasible");
        assert_eq!(selection.vessels(), &[10102950, 10657280, 10791900]);
        assert!((worst_case - 3_184_869.0).abs() <= WORST_CASE_TOLERANCE);
    }
}
