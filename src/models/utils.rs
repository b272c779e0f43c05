use good_lp::{variable, Expression, ProblemVariables, Solution, Variable};

/// Add one binary pick-or-skip variable per candidate.
pub fn binary_per_vessel(vars: &mut ProblemVariables, n: usize) -> Vec<Variable> {
    (0..n)
        .map(|v| vars.add(variable().binary().name(format!("x_{v}"))))
        .collect()
}

/// The linear expression `sum_v coefficients[v] * x[v]`.
pub fn weighted_sum(x: &[Variable], coefficients: &[f64]) -> Expression {
    x.iter()
        .zip(coefficients)
        .fold(Expression::from(0.0), |acc, (&var, &coefficient)| {
            acc + coefficient * var
        })
}

/// The indices whose binary variable is set in the incumbent solution.
pub fn chosen_indices<S: Solution>(solution: &S, x: &[Variable]) -> Vec<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, &var)| solution.value(var) > 0.5)
        .map(|(v, _)| v)
        .collect()
}
