use derive_more::Display;

pub mod fleet;
pub mod robust;
pub mod utils;

#[derive(Debug, Display)]
pub enum ModelError {
    /// The solver failed for a reason other than infeasibility.
    #[display(fmt = "solver failure: {}", _0)]
    Solver(String),
    /// The solver reported an optimal solution that fails its own
    /// constraints. Indicates a broken formulation, so it is fatal.
    #[display(fmt = "solution failed post-solve validation: {}", _0)]
    InvariantViolation(String),
    /// The robust model was given nothing to hedge against.
    #[display(fmt = "the scenario set is empty")]
    EmptyScenarioSet,
}

impl std::error::Error for ModelError {}
