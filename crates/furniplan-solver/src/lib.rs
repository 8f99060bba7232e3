mod problem;
mod simplex;
mod solution;

pub use problem::{Constraint, ConstraintOp, LpProblem, Objective};
pub use simplex::Solver;
pub use solution::{Analysis, ConstraintViolation, ReducedCost, ShadowPrice, Solution, SolutionStatus};

/// Anything that can solve an [`LpProblem`].
///
/// Implementations must be deterministic: solving the same problem twice yields the same
/// [`Solution`].
pub trait LinearProgramSolver {
    fn solve(&self, problem: &LpProblem) -> Solution;
}

impl<S: LinearProgramSolver + ?Sized> LinearProgramSolver for &S {
    fn solve(&self, problem: &LpProblem) -> Solution {
        (**self).solve(problem)
    }
}
