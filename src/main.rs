use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use serde_json::json;

use fleetmix::analysis::macc::build_macc;
use fleetmix::analysis::pareto::run_pareto_sweep;
use fleetmix::analysis::shadow::compute_shadow_prices;
use fleetmix::analysis::sweep::{
    evaluate_fleet_at_prices, run_carbon_price_sweep, run_safety_sweep,
};
use fleetmix::analysis::{fleet_efficiency, run_diversity_whatif, FleetReport};
use fleetmix::models::fleet::{FleetModel, SelectRequest};
use fleetmix::models::robust::RobustModel;
use fleetmix::parse::read_pool;
use fleetmix::scenario::{default_scenarios, fleet_costs_by_scenario, Scenario};

#[derive(Parser)]
#[clap(name = "fleetmix", about = "Minimum-cost cargo fleet selection")]
struct Args {
    /// Vessel pool: a JSON file holding an array of vessel records
    #[clap(long)]
    pool: PathBuf,
    /// Cargo demand the fleet must cover, in deadweight tonnes
    #[clap(long)]
    demand: f64,
    /// Minimum average fleet safety rating
    #[clap(long, default_value_t = 3.0)]
    min_safety: f64,
    /// Require every fuel type in the pool to be represented
    #[clap(long)]
    all_fuel_types: bool,
    /// Directory to write a timestamped copy of the result into
    #[clap(long)]
    out: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the base minimum-cost selection
    Select {
        /// Hard cap on total fleet emissions, tonnes CO2eq
        #[clap(long)]
        emissions_cap: Option<f64>,
    },
    /// Min-max selection across carbon/safety stress scenarios
    Robust {
        /// JSON file with the scenario set; defaults to the built-in
        /// stress set around the base safety threshold
        #[clap(long)]
        scenarios: Option<PathBuf>,
    },
    /// Re-optimize across a range of safety thresholds
    Sweep {
        #[clap(long, use_value_delimiter = true)]
        thresholds: Vec<f64>,
    },
    /// Re-optimize across a range of carbon prices
    CarbonSweep {
        #[clap(long, use_value_delimiter = true)]
        prices: Vec<f64>,
        /// Also evaluate the base-price fleet at every price without
        /// re-optimizing
        #[clap(long)]
        fixed_fleet: bool,
    },
    /// Trace the cost/emissions frontier
    Pareto {
        #[clap(long, default_value_t = 15)]
        points: usize,
    },
    /// Finite-difference shadow prices of demand and safety
    Shadow,
    /// Cost and shape of the fuel diversity requirement
    Diversity,
    /// Marginal abatement cost curve over stricter safety thresholds
    Macc {
        #[clap(long, use_value_delimiter = true)]
        thresholds: Vec<f64>,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let pool = read_pool(&args.pool)?;
    info!(
        "Loaded {} vessels with a combined capacity of {} DWT.",
        pool.len(),
        pool.total_capacity()
    );

    let request = SelectRequest {
        demand: args.demand,
        min_avg_safety: args.min_safety,
        require_all_fuel_types: args.all_fuel_types,
        emissions_cap: None,
    };

    match &args.command {
        Command::Select { emissions_cap } => {
            let request = SelectRequest {
                emissions_cap: *emissions_cap,
                ..request
            };
            let outcome = FleetModel::select(&pool, &request)?;
            let report = outcome
                .as_ref()
                .map(|s| FleetReport::of(&pool, s))
                .transpose()?;
            let efficiency = outcome
                .as_ref()
                .map(|s| fleet_efficiency(&pool, s.vessels(), args.demand))
                .transpose()?;
            emit(
                "select",
                &json!({
                    "feasible": report.is_some(),
                    "fleet": report,
                    "efficiency": efficiency,
                }),
                &args.out,
            )
        }
        Command::Robust { scenarios } => {
            let scenarios = match scenarios {
                Some(path) => read_scenarios(path)?,
                None => default_scenarios(args.min_safety),
            };
            let outcome =
                RobustModel::select(&pool, &scenarios, args.demand, args.all_fuel_types)?;
            let result = match outcome {
                None => json!({ "feasible": false }),
                Some((selection, worst_case)) => {
                    let costs = fleet_costs_by_scenario(&pool, &scenarios, selection.vessels())?;
                    let by_scenario: Vec<_> = scenarios
                        .iter()
                        .zip(&costs)
                        .map(|(s, &cost)| json!({ "scenario": s.name, "cost": cost }))
                        .collect();
                    json!({
                        "feasible": true,
                        "fleet": FleetReport::of(&pool, &selection)?,
                        "worst_case_cost": worst_case,
                        "scenario_costs": by_scenario,
                    })
                }
            };
            emit("robust", &result, &args.out)
        }
        Command::Sweep { thresholds } => {
            let thresholds = non_empty(thresholds, || vec![2.5, 3.0, 3.5, 4.0, 4.5]);
            let points =
                run_safety_sweep(&pool, &thresholds, args.demand, args.all_fuel_types)?;
            emit("safety_sweep", &points, &args.out)
        }
        Command::CarbonSweep {
            prices,
            fixed_fleet,
        } => {
            let prices = non_empty(prices, || vec![0.0, 40.0, 80.0, 120.0, 160.0, 200.0]);
            let points = run_carbon_price_sweep(
                &pool,
                &prices,
                args.demand,
                args.min_safety,
                args.all_fuel_types,
            )?;
            let fixed = match fixed_fleet {
                false => None,
                true => FleetModel::select(&pool, &request)?
                    .map(|s| evaluate_fleet_at_prices(&pool, &prices, s.vessels()))
                    .transpose()?,
            };
            emit(
                "carbon_sweep",
                &json!({ "reoptimized": points, "fixed_fleet": fixed }),
                &args.out,
            )
        }
        Command::Pareto { points } => {
            let frontier = run_pareto_sweep(
                &pool,
                *points,
                args.demand,
                args.min_safety,
                args.all_fuel_types,
            )?;
            emit("pareto", &frontier, &args.out)
        }
        Command::Shadow => {
            let prices = compute_shadow_prices(
                &pool,
                args.demand,
                args.min_safety,
                args.all_fuel_types,
            )?;
            emit("shadow_prices", &prices, &args.out)
        }
        Command::Diversity => {
            let whatif = run_diversity_whatif(&pool, args.demand, args.min_safety)?;
            emit("diversity", &whatif, &args.out)
        }
        Command::Macc { thresholds } => {
            let thresholds = non_empty(thresholds, || {
                vec![args.min_safety + 0.5, args.min_safety + 1.0]
            });
            let baseline = match FleetModel::select(&pool, &request)? {
                Some(selection) => selection,
                None => return emit("macc", &json!({ "feasible": false }), &args.out),
            };

            let mut alternatives = Vec::new();
            for &threshold in &thresholds {
                let stricter = SelectRequest {
                    min_avg_safety: threshold,
                    ..request.clone()
                };
                if let Some(selection) = FleetModel::select(&pool, &stricter)? {
                    alternatives.push((
                        format!("safety>={threshold}"),
                        selection.vessels().to_vec(),
                    ));
                }
            }

            let curve = build_macc(&pool, baseline.vessels(), &alternatives)?;
            emit("macc", &curve, &args.out)
        }
    }
}

fn read_scenarios(path: &PathBuf) -> Result<Vec<Scenario>, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    let scenarios: Vec<Scenario> = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(scenarios)
}

fn non_empty(values: &[f64], default: impl FnOnce() -> Vec<f64>) -> Vec<f64> {
    match values.is_empty() {
        true => default(),
        false => values.to_vec(),
    }
}

/// Print the result as pretty JSON and optionally keep a timestamped copy.
fn emit<T: Serialize>(label: &str, value: &T, out: &Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)?;
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{label}_{timestamp}.json"));
        std::fs::write(&path, rendered)?;
        info!("Wrote {}.", path.display());
    }

    Ok(())
}
