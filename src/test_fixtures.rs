use crate::problem::{Pool, Vessel, VesselId};

/// The embedded carbon price of the checkpoint fixture costs.
pub const BASE_CARBON_PRICE: f64 = 80.0;

/// The ids of the checkpoint vessels, ascending.
pub const ALL_IDS: [VesselId; 5] = [10102950, 10522650, 10657280, 10673120, 10791900];

fn vessel(id: VesselId, capacity: f64, rating: u8, fuel: &str, cost: f64, emissions: f64) -> Vessel {
    Vessel::new(
        id,
        capacity,
        rating,
        fuel.to_string(),
        cost,
        emissions * BASE_CARBON_PRICE,
        emissions,
    )
}

/// The five checkpoint vessels used throughout the tests. Capacities sum
/// to 855,421 DWT and costs to 5,526,543 USD.
///
/// At demand 500,000 and an average-safety floor of 3.0 the unique optimum
/// is {10102950, 10657280, 10791900} at 3,184,869: the only other
/// demand-covering triples either miss the safety floor (the hydrogen
/// carrier rates 2) or cost more (1,043,965 + 1,260,216 + 1,156,134).
pub fn checkpoint_pool() -> Pool {
    Pool::new(vec![
        vessel(10102950, 175_108.0, 1, "DISTILLATE FUEL", 880_688.0, 574.53),
        vessel(10657280, 206_331.0, 3, "Ammonia", 1_260_216.0, 143.08),
        vessel(10791900, 179_700.0, 5, "LNG", 1_043_965.0, 548.51),
        vessel(10522650, 115_444.0, 3, "Methanol", 1_156_134.0, 548.38),
        vessel(10673120, 178_838.0, 2, "Hydrogen", 1_185_540.0, 103.67),
    ])
    .unwrap()
}
