use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Cargo capacity, in deadweight tonnes.
pub type Capacity = f64;
/// Cost, in USD per period.
pub type Cost = f64;
/// Emissions, in tonnes CO2-equivalent per period.
pub type Emissions = f64;

/// External vessel identifier, as it appears in the source data.
pub type VesselId = u64;
/// Position of a vessel within a pool.
pub type VesselIndex = usize;

/// A candidate vessel that the selection models can charter in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    id: VesselId,
    capacity: Capacity,
    safety_rating: u8,
    fuel_type: String,
    cost: Cost,
    #[serde(default)]
    carbon_cost: Cost,
    emissions: Emissions,
}

impl Vessel {
    pub fn new(
        id: VesselId,
        capacity: Capacity,
        safety_rating: u8,
        fuel_type: String,
        cost: Cost,
        carbon_cost: Cost,
        emissions: Emissions,
    ) -> Vessel {
        Vessel {
            id,
            capacity,
            safety_rating,
            fuel_type,
            cost,
            carbon_cost,
            emissions,
        }
    }

    /// The external identifier of this vessel
    pub fn id(&self) -> VesselId {
        self.id
    }

    /// Cargo capacity in deadweight tonnes
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Safety rating on the 1 (worst) to 5 (best) scale
    pub fn safety_rating(&self) -> u8 {
        self.safety_rating
    }

    /// The main engine fuel type
    pub fn fuel_type(&self) -> &str {
        &self.fuel_type
    }

    /// Total per-period cost of operating this vessel, carbon included
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// The carbon component embedded in `cost`
    pub fn carbon_cost(&self) -> Cost {
        self.carbon_cost
    }

    /// Per-period emissions in tonnes CO2eq
    pub fn emissions(&self) -> Emissions {
        self.emissions
    }

    /// The vessel's cost with the embedded carbon component re-priced
    /// at `price` USD per tonne CO2eq.
    pub fn cost_at_carbon_price(&self, price: f64) -> Cost {
        self.cost - self.carbon_cost + self.emissions * price
    }
}

#[derive(Debug, Display)]
pub enum PoolConstructionError {
    #[display(fmt = "duplicate vessel id {}", _0)]
    DuplicateId(VesselId),
    #[display(fmt = "vessel {}: capacity must be positive (got {})", id, capacity)]
    NonPositiveCapacity { id: VesselId, capacity: f64 },
    #[display(fmt = "vessel {}: cost must be positive (got {})", id, cost)]
    NonPositiveCost { id: VesselId, cost: f64 },
    #[display(
        fmt = "vessel {}: carbon cost can not be negative (got {})",
        id,
        carbon_cost
    )]
    NegativeCarbonCost { id: VesselId, carbon_cost: f64 },
    #[display(fmt = "vessel {}: emissions can not be negative (got {})", id, emissions)]
    NegativeEmissions { id: VesselId, emissions: f64 },
    #[display(
        fmt = "vessel {}: safety rating must be within 1..=5 (got {})",
        id,
        rating
    )]
    SafetyRatingOutOfRange { id: VesselId, rating: u8 },
}

impl std::error::Error for PoolConstructionError {}

/// A selection referred to a vessel id that is not in the pool.
#[derive(Debug, Display)]
#[display(fmt = "unknown vessel id {} in selection", _0)]
pub struct UnknownVessel(pub VesselId);

impl std::error::Error for UnknownVessel {}

/// An ordered, immutable pool of candidate vessels with unique ids.
///
/// The pool is never mutated after construction. Analyses that re-price
/// carbon derive a fresh pool instead (see `cost::adjust_costs`).
#[derive(Debug, Clone)]
pub struct Pool {
    vessels: Vec<Vessel>,
}

impl Pool {
    pub fn new(vessels: Vec<Vessel>) -> Result<Pool, PoolConstructionError> {
        use PoolConstructionError::*;

        for (i, vessel) in vessels.iter().enumerate() {
            let id = vessel.id;
            if vessels[..i].iter().any(|other| other.id == id) {
                return Err(DuplicateId(id));
            }
            if vessel.capacity <= 0.0 {
                return Err(NonPositiveCapacity {
                    id,
                    capacity: vessel.capacity,
                });
            }
            if vessel.cost <= 0.0 {
                return Err(NonPositiveCost {
                    id,
                    cost: vessel.cost,
                });
            }
            if vessel.carbon_cost < 0.0 {
                return Err(NegativeCarbonCost {
                    id,
                    carbon_cost: vessel.carbon_cost,
                });
            }
            if vessel.emissions < 0.0 {
                return Err(NegativeEmissions {
                    id,
                    emissions: vessel.emissions,
                });
            }
            if !(1..=5).contains(&vessel.safety_rating) {
                return Err(SafetyRatingOutOfRange {
                    id,
                    rating: vessel.safety_rating,
                });
            }
        }

        Ok(Pool { vessels })
    }

    /// The vessels of this pool, in construction order
    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// The vessel with the given id, if present
    pub fn get(&self, id: VesselId) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.id == id)
    }

    /// The position of the vessel with the given id, if present
    pub fn index_of(&self, id: VesselId) -> Option<VesselIndex> {
        self.vessels.iter().position(|v| v.id == id)
    }

    /// Resolve a list of vessel ids against the pool. Any unknown id is
    /// malformed input.
    pub fn subset(&self, ids: &[VesselId]) -> Result<Vec<&Vessel>, UnknownVessel> {
        ids.iter()
            .map(|&id| self.get(id).ok_or(UnknownVessel(id)))
            .collect()
    }

    /// The distinct fuel types of the pool, in first-occurrence order.
    pub fn fuel_types(&self) -> Vec<&str> {
        let mut fuels: Vec<&str> = Vec::new();
        for vessel in &self.vessels {
            if !fuels.contains(&vessel.fuel_type.as_str()) {
                fuels.push(&vessel.fuel_type);
            }
        }
        fuels
    }

    /// Combined capacity of every vessel in the pool
    pub fn total_capacity(&self) -> Capacity {
        self.vessels.iter().map(|v| v.capacity).sum()
    }
}
