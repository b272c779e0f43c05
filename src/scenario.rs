use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::problem::{Pool, UnknownVessel, VesselId};

/// One future against which the robust model hedges: a carbon price and a
/// minimum average fleet safety requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Carbon price in USD per tonne CO2eq
    pub carbon_price: f64,
    /// Minimum average fleet safety rating
    pub min_avg_safety: f64,
}

impl Scenario {
    pub fn new(name: &str, carbon_price: f64, min_avg_safety: f64) -> Scenario {
        Scenario {
            name: name.to_string(),
            carbon_price,
            min_avg_safety,
        }
    }
}

/// The standard stress set: the base case, a stricter safety requirement,
/// a doubled carbon price, and both stresses combined.
pub fn default_scenarios(base_safety: f64) -> Vec<Scenario> {
    vec![
        Scenario::new("base", 80.0, base_safety),
        Scenario::new("safety_stress", 80.0, base_safety + 0.5),
        Scenario::new("carbon_stress", 160.0, base_safety),
        Scenario::new("joint_stress", 160.0, base_safety + 0.5),
    ]
}

/// The cost of each vessel under each scenario, as a dense
/// (vessel, scenario) matrix. Row order follows the pool, column order the
/// scenario slice. Recomputed on every call; never cached.
pub fn cost_matrix(pool: &Pool, scenarios: &[Scenario]) -> Array2<f64> {
    let mut matrix = Array2::zeros((pool.len(), scenarios.len()));
    for (v, vessel) in pool.vessels().iter().enumerate() {
        for (s, scenario) in scenarios.iter().enumerate() {
            matrix[[v, s]] = vessel.cost_at_carbon_price(scenario.carbon_price);
        }
    }
    matrix
}

/// The total cost of a fixed selection under each scenario.
pub fn fleet_costs_by_scenario(
    pool: &Pool,
    scenarios: &[Scenario],
    selection: &[VesselId],
) -> Result<Vec<f64>, UnknownVessel> {
    let vessels = pool.subset(selection)?;
    Ok(scenarios
        .iter()
        .map(|scenario| {
            vessels
                .iter()
                .map(|v| v.cost_at_carbon_price(scenario.carbon_price))
                .sum()
        })
        .collect())
}
