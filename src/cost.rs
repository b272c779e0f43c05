use std::collections::HashMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::problem::{Pool, PoolConstructionError, Vessel};

/// The lookup key used for auxiliary engines and boilers, which burn
/// distillate regardless of the main engine fuel.
const DISTILLATE: &str = "Distillate fuel";

/// A CAPEX base-cost bracket by deadweight tonnage.
#[derive(Debug, Clone, Copy)]
pub struct CapexBracket {
    pub lower: f64,
    pub upper: f64,
    pub base_cost_millions: f64,
}

#[derive(Debug, Display)]
pub enum CostError {
    #[display(fmt = "unknown fuel type: {}", _0)]
    UnknownFuelType(String),
    #[display(fmt = "deadweight {} outside the CAPEX brackets", _0)]
    DwtOutOfRange(f64),
}

impl std::error::Error for CostError {}

/// Inputs to the per-vessel cost calculation, for one voyage over the
/// one-month planning period.
#[derive(Debug, Clone)]
pub struct VesselCostInputs {
    pub dwt: f64,
    pub safety_rating: u8,
    pub fuel_type: String,
    /// Main engine fuel burn, tonnes
    pub fuel_me_tonnes: f64,
    /// Auxiliary engine fuel burn, tonnes
    pub fuel_ae_tonnes: f64,
    /// Auxiliary boiler fuel burn, tonnes
    pub fuel_ab_tonnes: f64,
    /// Voyage emissions, tonnes CO2eq
    pub co2e_tonnes: f64,
}

/// One vessel's cost split into its components.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub fuel_cost: f64,
    pub carbon_cost: f64,
    pub ownership_cost: f64,
    pub risk_premium: f64,
    pub total: f64,
}

/// IMO carbon intensity rating band, best (A) to worst (E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CiiRating {
    A,
    B,
    C,
    D,
    E,
}

impl CiiRating {
    /// The band for a carbon intensity in grams CO2eq per tonne-mile.
    pub fn of(carbon_intensity: f64) -> CiiRating {
        match carbon_intensity {
            c if c <= 3.5 => CiiRating::A,
            c if c <= 4.5 => CiiRating::B,
            c if c <= 5.5 => CiiRating::C,
            c if c <= 6.5 => CiiRating::D,
            _ => CiiRating::E,
        }
    }

    /// Cost multiplier under CII enforcement: A-rated tonnage earns a
    /// charter discount, D and E pay a penalty.
    pub fn penalty_multiplier(&self) -> f64 {
        match self {
            CiiRating::A => 0.95,
            CiiRating::B => 0.98,
            CiiRating::C => 1.00,
            CiiRating::D => 1.05,
            CiiRating::E => 1.10,
        }
    }
}

/// Installed auxiliary machinery of one vessel, for pricing time spent
/// waiting at anchor.
#[derive(Debug, Clone)]
pub struct AuxEngineProfile {
    pub ae_power_kw: f64,
    pub ab_power_kw: f64,
    /// Auxiliary engine specific fuel consumption, g/kWh
    pub sfc_ae_g_per_kwh: f64,
    /// Auxiliary boiler specific fuel consumption, g/kWh
    pub sfc_ab_g_per_kwh: f64,
}

/// A market-conditions stress bundle: fuel price volatility, port
/// congestion, and CII enforcement, applied on top of the plain cost model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    /// Multiplier on the fuel bill
    pub fuel_price_multiplier: f64,
    /// Extra hours spent waiting at anchor, burning auxiliary fuel
    pub congestion_hours: f64,
    /// Whether the CII rating multiplier applies to the total cost
    pub enforce_cii: bool,
}

impl StressScenario {
    pub fn new(
        name: &str,
        fuel_price_multiplier: f64,
        congestion_hours: f64,
        enforce_cii: bool,
    ) -> StressScenario {
        StressScenario {
            name: name.to_string(),
            fuel_price_multiplier,
            congestion_hours,
            enforce_cii,
        }
    }

    /// The idealised baseline and the typical and stressed 2024 market
    /// conditions.
    pub fn default_set() -> Vec<StressScenario> {
        vec![
            StressScenario::new("Base (Idealised)", 1.00, 0.0, false),
            StressScenario::new("2024 Typical", 1.05, 48.0, true),
            StressScenario::new("2024 Stress", 1.10, 72.0, true),
        ]
    }
}

/// A cost breakdown under a stress scenario, with the carbon intensity
/// figures behind the CII leg.
#[derive(Debug, Clone)]
pub struct StressedCost {
    pub breakdown: CostBreakdown,
    /// Grams CO2eq per tonne-mile, including congestion fuel
    pub carbon_intensity: f64,
    pub cii_rating: CiiRating,
    /// 1.0 when the scenario does not enforce CII
    pub cii_multiplier: f64,
}

/// Immutable cost-model configuration. Constructed once and passed
/// explicitly to whatever needs it.
#[derive(Debug, Clone)]
pub struct CostConfig {
    /// Fuel price in USD per GJ, by fuel type
    pub fuel_price_usd_per_gj: HashMap<String, f64>,
    /// Lower calorific value in MJ/kg, by fuel type
    pub lcv_mj_per_kg: HashMap<String, f64>,
    /// CAPEX base cost brackets, ordered by deadweight
    pub capex_brackets: Vec<CapexBracket>,
    /// CAPEX multiplier by fuel type
    pub capex_fuel_multiplier: HashMap<String, f64>,
    /// Capital recovery factor (i = 5%, n = 15 years)
    pub crf: f64,
    /// Salvage value as a fraction of ship cost
    pub salvage_rate: f64,
    /// Required return on the salvage value
    pub discount_rate: f64,
    /// Cost adjustment rate by safety rating, index 0 = rating 1.
    /// Positive is a surcharge, negative a discount.
    pub safety_adjustment_rates: [f64; 5],
    /// Carbon price in USD per tonne CO2eq
    pub carbon_price: f64,
    /// Raw registry fuel labels mapped to the canonical table keys.
    /// Labels not in the map are used as-is.
    pub fuel_label_map: HashMap<String, String>,
    /// One-way route distance in nautical miles, for carbon intensity
    pub route_distance_nm: f64,
    /// Fraction of installed auxiliary power drawn while waiting at anchor
    pub congestion_aux_load_factor: f64,
    /// Tonnes CO2 per tonne of distillate burned
    pub distillate_co2_factor: f64,
}

impl Default for CostConfig {
    fn default() -> CostConfig {
        let fuel_price_usd_per_gj = [
            (DISTILLATE, 13.0),
            ("LPG (Propane)", 15.0),
            ("LPG (Butane)", 15.0),
            ("LNG", 15.0),
            ("Methanol", 54.0),
            ("Ethanol", 54.0),
            ("Ammonia", 40.0),
            ("Hydrogen", 50.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let lcv_mj_per_kg = [
            (DISTILLATE, 42.7),
            ("Light Fuel Oil", 41.2),
            ("Heavy Fuel Oil", 40.2),
            ("LPG (Propane)", 46.3),
            ("LPG (Butane)", 45.7),
            ("LNG", 48.0),
            ("Methanol", 19.9),
            ("Ethanol", 26.8),
            ("Ammonia", 18.6),
            ("Hydrogen", 120.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let capex_fuel_multiplier = [
            (DISTILLATE, 1.0),
            ("LPG (Propane)", 1.3),
            ("LPG (Butane)", 1.35),
            ("LNG", 1.4),
            ("Methanol", 1.3),
            ("Ethanol", 1.2),
            ("Ammonia", 1.4),
            ("Hydrogen", 1.1),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let capex_brackets = vec![
            CapexBracket {
                lower: 10_000.0,
                upper: 40_000.0,
                base_cost_millions: 35.0,
            },
            CapexBracket {
                lower: 40_000.0,
                upper: 55_000.0,
                base_cost_millions: 53.0,
            },
            CapexBracket {
                lower: 55_000.0,
                upper: 80_000.0,
                base_cost_millions: 80.0,
            },
            CapexBracket {
                lower: 80_000.0,
                upper: 120_000.0,
                base_cost_millions: 78.0,
            },
            CapexBracket {
                lower: 120_000.0,
                upper: f64::INFINITY,
                base_cost_millions: 90.0,
            },
        ];

        // vessel registries carry the distillate label in upper case
        let fuel_label_map = [("DISTILLATE FUEL", DISTILLATE)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        CostConfig {
            fuel_price_usd_per_gj,
            lcv_mj_per_kg,
            capex_brackets,
            capex_fuel_multiplier,
            crf: 0.088827,
            salvage_rate: 0.10,
            discount_rate: 0.08,
            safety_adjustment_rates: [0.10, 0.05, 0.00, -0.02, -0.05],
            carbon_price: 80.0,
            fuel_label_map,
            route_distance_nm: 1_762.0,
            congestion_aux_load_factor: 0.5,
            distillate_co2_factor: 3.206,
        }
    }
}

impl CostConfig {
    /// The canonical table key for a fuel label.
    fn canonical_fuel<'a>(&'a self, fuel_type: &'a str) -> &'a str {
        self.fuel_label_map
            .get(fuel_type)
            .map(String::as_str)
            .unwrap_or(fuel_type)
    }

    /// Fuel price in USD per tonne: USD/GJ times MJ/kg.
    pub fn fuel_price_usd_per_tonne(&self, fuel_type: &str) -> Result<f64, CostError> {
        let fuel = self.canonical_fuel(fuel_type);
        let price = self
            .fuel_price_usd_per_gj
            .get(fuel)
            .ok_or_else(|| CostError::UnknownFuelType(fuel_type.to_string()))?;
        let lcv = self
            .lcv_mj_per_kg
            .get(fuel)
            .ok_or_else(|| CostError::UnknownFuelType(fuel_type.to_string()))?;
        Ok(price * lcv)
    }

    /// Base CAPEX in millions of USD by deadweight bracket.
    ///
    /// The first bracket is inclusive at both ends, later brackets are
    /// lower-exclusive, and the last bracket is open upwards.
    pub fn base_capex_millions(&self, dwt: f64) -> Result<f64, CostError> {
        for (i, bracket) in self.capex_brackets.iter().enumerate() {
            let hit = if i == 0 {
                bracket.lower <= dwt && dwt <= bracket.upper
            } else {
                bracket.lower < dwt && dwt <= bracket.upper
            };
            if hit {
                return Ok(bracket.base_cost_millions);
            }
        }
        Err(CostError::DwtOutOfRange(dwt))
    }

    pub fn capex_multiplier(&self, fuel_type: &str) -> Result<f64, CostError> {
        self.capex_fuel_multiplier
            .get(self.canonical_fuel(fuel_type))
            .copied()
            .ok_or_else(|| CostError::UnknownFuelType(fuel_type.to_string()))
    }

    /// Amortized ownership cost per month.
    pub fn monthly_capex(&self, dwt: f64, fuel_type: &str) -> Result<f64, CostError> {
        let ship_cost =
            self.base_capex_millions(dwt)? * self.capex_multiplier(fuel_type)? * 1e6;
        let salvage = self.salvage_rate * ship_cost;
        let annual = (ship_cost - salvage) * self.crf + self.discount_rate * salvage;
        Ok(annual / 12.0)
    }

    /// The cost adjustment rate for a safety rating. Ratings outside the
    /// 1..=5 scale are treated as neutral.
    pub fn safety_adjustment(&self, rating: u8) -> f64 {
        match rating {
            1..=5 => self.safety_adjustment_rates[rating as usize - 1],
            _ => 0.0,
        }
    }

    /// Total per-period cost of one vessel: fuel, carbon, amortized
    /// ownership, and the safety risk premium on top of their sum.
    pub fn vessel_cost(&self, inputs: &VesselCostInputs) -> Result<CostBreakdown, CostError> {
        let me_price = self.fuel_price_usd_per_tonne(&inputs.fuel_type)?;
        let aux_price = self.fuel_price_usd_per_tonne(DISTILLATE)?;
        let fuel_cost = inputs.fuel_me_tonnes * me_price
            + (inputs.fuel_ae_tonnes + inputs.fuel_ab_tonnes) * aux_price;

        let carbon_cost = inputs.co2e_tonnes * self.carbon_price;
        let ownership_cost = self.monthly_capex(inputs.dwt, &inputs.fuel_type)?;

        let base = fuel_cost + carbon_cost + ownership_cost;
        let risk_premium = base * self.safety_adjustment(inputs.safety_rating);

        Ok(CostBreakdown {
            fuel_cost,
            carbon_cost,
            ownership_cost,
            risk_premium,
            total: base + risk_premium,
        })
    }

    /// Carbon intensity in grams CO2eq per tonne-mile over the configured
    /// route. Zero for a vessel with no deadweight.
    pub fn carbon_intensity(&self, co2e_tonnes: f64, dwt: f64) -> f64 {
        if dwt <= 0.0 || self.route_distance_nm <= 0.0 {
            return 0.0;
        }
        co2e_tonnes * 1e6 / (dwt * self.route_distance_nm)
    }

    /// Auxiliary fuel burned while waiting at anchor: (engine, boiler)
    /// tonnes at the configured part load.
    pub fn congestion_fuel_tonnes(&self, aux: &AuxEngineProfile, hours: f64) -> (f64, f64) {
        let load = self.congestion_aux_load_factor;
        let ae = aux.ae_power_kw * aux.sfc_ae_g_per_kwh * hours * load / 1e6;
        let ab = aux.ab_power_kw * aux.sfc_ab_g_per_kwh * hours * load / 1e6;
        (ae, ab)
    }

    /// Per-vessel cost under a stress scenario: congestion fuel is added to
    /// the auxiliary burn (and its CO2 to the voyage emissions), the fuel
    /// bill is scaled by the volatility multiplier, and the CII multiplier
    /// is applied to the total when the scenario enforces it.
    pub fn vessel_cost_under_stress(
        &self,
        inputs: &VesselCostInputs,
        aux: Option<&AuxEngineProfile>,
        scenario: &StressScenario,
    ) -> Result<StressedCost, CostError> {
        let mut inputs = inputs.clone();

        if scenario.congestion_hours > 0.0 {
            if let Some(aux) = aux {
                let (ae, ab) = self.congestion_fuel_tonnes(aux, scenario.congestion_hours);
                inputs.fuel_ae_tonnes += ae;
                inputs.fuel_ab_tonnes += ab;
                // waiting machinery burns distillate
                inputs.co2e_tonnes += (ae + ab) * self.distillate_co2_factor;
            }
        }

        let mut breakdown = self.vessel_cost(&inputs)?;
        if scenario.fuel_price_multiplier != 1.0 {
            breakdown.fuel_cost *= scenario.fuel_price_multiplier;
            let base = breakdown.fuel_cost + breakdown.carbon_cost + breakdown.ownership_cost;
            breakdown.risk_premium = base * self.safety_adjustment(inputs.safety_rating);
            breakdown.total = base + breakdown.risk_premium;
        }

        let carbon_intensity = self.carbon_intensity(inputs.co2e_tonnes, inputs.dwt);
        let cii_rating = CiiRating::of(carbon_intensity);
        let cii_multiplier = match scenario.enforce_cii {
            true => cii_rating.penalty_multiplier(),
            false => 1.0,
        };
        breakdown.total *= cii_multiplier;

        Ok(StressedCost {
            breakdown,
            carbon_intensity,
            cii_rating,
            cii_multiplier,
        })
    }
}

/// A copy of the pool with every vessel's carbon component re-priced at
/// `carbon_price`. The input pool is untouched. Fails only if repricing
/// drives some vessel's total cost to zero or below.
pub fn adjust_costs(pool: &Pool, carbon_price: f64) -> Result<Pool, PoolConstructionError> {
    let vessels = pool
        .vessels()
        .iter()
        .map(|v| {
            let carbon_cost = v.emissions() * carbon_price;
            Vessel::new(
                v.id(),
                v.capacity(),
                v.safety_rating(),
                v.fuel_type().to_string(),
                v.cost_at_carbon_price(carbon_price),
                carbon_cost,
                v.emissions(),
            )
        })
        .collect();
    Pool::new(vessels)
}

/// A copy of the pool with every vessel's selection cost scaled by its CII
/// rating multiplier, so the selector sees CII-enforced prices. The carbon
/// component is left at its embedded value.
pub fn apply_cii_penalties(
    pool: &Pool,
    config: &CostConfig,
) -> Result<Pool, PoolConstructionError> {
    let vessels = pool
        .vessels()
        .iter()
        .map(|v| {
            let rating = CiiRating::of(config.carbon_intensity(v.emissions(), v.capacity()));
            Vessel::new(
                v.id(),
                v.capacity(),
                v.safety_rating(),
                v.fuel_type().to_string(),
                v.cost() * rating.penalty_multiplier(),
                v.carbon_cost(),
                v.emissions(),
            )
        })
        .collect();
    Pool::new(vessels)
}
