pub mod model;

pub use model::RobustModel;
