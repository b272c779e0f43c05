use crate::problem::{Pool, VesselIndex};

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Sets {
    /// Set of candidate vessels
    pub V: Vec<VesselIndex>,
    /// Set of fuel types present in the pool, in first-occurrence order
    pub F: Vec<String>,
}

#[derive(Debug)]
#[allow(non_snake_case)]
pub struct Parameters {
    /// Selection cost of vessel v
    pub cost: Vec<f64>,
    /// Cargo capacity of vessel v
    pub capacity: Vec<f64>,
    /// safety_rating(v) minus the average-safety threshold. A nonnegative
    /// selection-weighted sum of these is exactly the average-safety
    /// requirement, with the vessel count moved to the left-hand side.
    pub safety_delta: Vec<f64>,
    /// Emissions of vessel v
    pub emissions: Vec<f64>,
    /// For each fuel type f, the vessels powered by f
    pub vessels_by_fuel: Vec<Vec<VesselIndex>>,
}

impl Sets {
    pub fn new(pool: &Pool) -> Sets {
        Sets {
            V: (0..pool.len()).collect(),
            F: pool.fuel_types().into_iter().map(String::from).collect(),
        }
    }
}

impl Parameters {
    pub fn new(pool: &Pool, sets: &Sets, min_avg_safety: f64) -> Parameters {
        let vessels = pool.vessels();

        let vessels_by_fuel = sets
            .F
            .iter()
            .map(|fuel| {
                sets.V
                    .iter()
                    .copied()
                    .filter(|&v| vessels[v].fuel_type() == fuel)
                    .collect()
            })
            .collect();

        Parameters {
            cost: vessels.iter().map(|v| v.cost()).collect(),
            capacity: vessels.iter().map(|v| v.capacity()).collect(),
            safety_delta: vessels
                .iter()
                .map(|v| v.safety_rating() as f64 - min_avg_safety)
                .collect(),
            emissions: vessels.iter().map(|v| v.emissions()).collect(),
            vessels_by_fuel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::checkpoint_pool;

    #[test]
    fn every_vessel_appears_in_exactly_one_fuel_group() {
        let pool = checkpoint_pool();
        let sets = Sets::new(&pool);
        let parameters = Parameters::new(&pool, &sets, 3.0);

        let mut seen = vec![0usize; pool.len()];
        for group in &parameters.vessels_by_fuel {
            for &v in group {
                seen[v] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn safety_delta_is_centered_on_the_threshold() {
        let pool = checkpoint_pool();
        let sets = Sets::new(&pool);
        let parameters = Parameters::new(&pool, &sets, 3.0);
        // ratings 1, 3, 5, 3, 2
        assert_eq!(parameters.safety_delta, vec![-2.0, 0.0, 2.0, 0.0, -1.0]);
    }
}
