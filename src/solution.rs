use serde::Serialize;

use crate::problem::{Pool, UnknownVessel, VesselId};

/// The outcome of a successful solve: the chosen vessel ids (sorted
/// ascending) and the objective value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSelection {
    vessels: Vec<VesselId>,
    objective: f64,
}

impl FleetSelection {
    pub fn new(mut vessels: Vec<VesselId>, objective: f64) -> FleetSelection {
        vessels.sort_unstable();
        FleetSelection { vessels, objective }
    }

    /// The selected vessel ids, ascending
    pub fn vessels(&self) -> &[VesselId] {
        &self.vessels
    }

    /// The objective value of the solve that produced this selection
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }
}

/// Aggregate metrics of a selection against its pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetMetrics {
    pub total_capacity: f64,
    pub total_cost: f64,
    /// Mean safety rating; 0.0 for an empty selection
    pub mean_safety: f64,
    pub fleet_size: usize,
    pub total_emissions: f64,
    pub unique_fuel_types: usize,
}

impl FleetMetrics {
    pub fn of(pool: &Pool, selection: &[VesselId]) -> Result<FleetMetrics, UnknownVessel> {
        let vessels = pool.subset(selection)?;

        let total_capacity = vessels.iter().map(|v| v.capacity()).sum();
        let total_cost = vessels.iter().map(|v| v.cost()).sum();
        let total_emissions = vessels.iter().map(|v| v.emissions()).sum();
        let fleet_size = vessels.len();
        let mean_safety = match fleet_size {
            0 => 0.0,
            n => vessels.iter().map(|v| v.safety_rating() as f64).sum::<f64>() / n as f64,
        };

        let mut fuels: Vec<&str> = Vec::new();
        for vessel in &vessels {
            if !fuels.contains(&vessel.fuel_type()) {
                fuels.push(vessel.fuel_type());
            }
        }

        Ok(FleetMetrics {
            total_capacity,
            total_cost,
            mean_safety,
            fleet_size,
            total_emissions,
            unique_fuel_types: fuels.len(),
        })
    }
}

/// The number of selected vessels per fuel type, in the pool's
/// first-occurrence fuel order. Fuel types with no selected vessel are
/// omitted.
pub fn fuel_type_counts(
    pool: &Pool,
    selection: &[VesselId],
) -> Result<Vec<(String, usize)>, UnknownVessel> {
    let vessels = pool.subset(selection)?;
    let mut counts: Vec<(String, usize)> = Vec::new();
    for fuel in pool.fuel_types() {
        let count = vessels.iter().filter(|v| v.fuel_type() == fuel).count();
        if count > 0 {
            counts.push((fuel.to_string(), count));
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{checkpoint_pool, ALL_IDS};

    #[test]
    fn selection_sorts_its_ids() {
        let selection = FleetSelection::new(vec![3, 1, 2], 10.0);
        assert_eq!(selection.vessels(), &[1, 2, 3]);
    }

    #[test]
    fn metrics_for_the_full_checkpoint_fleet() {
        let pool = checkpoint_pool();
        let metrics = FleetMetrics::of(&pool, &ALL_IDS).unwrap();
        assert_eq!(metrics.total_capacity, 855_421.0);
        assert_eq!(metrics.total_cost, 5_526_543.0);
        assert_eq!(metrics.fleet_size, 5);
        // ratings 1, 3, 5, 3, 2
        assert_eq!(metrics.mean_safety, 2.8);
        assert_eq!(metrics.unique_fuel_types, 5);
        let expected_emissions = 574.53 + 143.08 + 548.51 + 548.38 + 103.67;
        assert!((metrics.total_emissions - expected_emissions).abs() < 1e-9);
    }

    #[test]
    fn metrics_of_an_empty_selection() {
        let pool = checkpoint_pool();
        let metrics = FleetMetrics::of(&pool, &[]).unwrap();
        assert_eq!(metrics.fleet_size, 0);
        assert_eq!(metrics.mean_safety, 0.0);
        assert_eq!(metrics.total_cost, 0.0);
    }

    #[test]
    fn fuel_counts_follow_pool_order_and_skip_absent_fuels() {
        let pool = checkpoint_pool();
        let counts = fuel_type_counts(&pool, &[10791900, 10673120]).unwrap();
        assert_eq!(
            counts,
            vec![("LNG".to_string(), 1), ("Hydrogen".to_string(), 1)]
        );
    }

    #[test]
    fn metrics_reject_unknown_ids() {
        let pool = checkpoint_pool();
        assert!(FleetMetrics::of(&pool, &[1]).is_err());
    }
}
