//! Minimum-cost cargo fleet selection.
//!
//! Picks a subset of a candidate vessel pool that covers a cargo demand at
//! minimum total cost, subject to an average-safety requirement and
//! optionally fuel diversity and an emissions cap. On top of the exact
//! selector sit a robust min-max variant over carbon/safety scenarios and a
//! set of sensitivity analyses: threshold sweeps, a cost/emissions frontier,
//! finite-difference shadow prices, and an abatement cost curve.

pub mod analysis;
pub mod cost;
pub mod models;
pub mod parse;
pub mod problem;
pub mod scenario;
pub mod solution;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_fixtures;
