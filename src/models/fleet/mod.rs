pub mod model;
pub mod sets_and_parameters;

pub use model::{FleetModel, SelectRequest};
pub use sets_and_parameters::{Parameters, Sets};
