use furniplan_solver::{ConstraintOp, LpProblem};

use crate::catalog::Catalog;

/// Compile the catalog into the revenue LP:
///
/// ```text
/// maximize   Σ price[j] · x[j]
/// subject to Σ matrix[i][j] · x[j] <= availability[i]   for every resource i
///            x[j] >= minimum                             for every product j
/// ```
///
/// Variables are named after products and constraints after resources, in catalog order,
/// so solution vectors line up with [`Catalog::products`] and [`Catalog::resources`].
pub fn compile_revenue_problem(catalog: &Catalog, minimum: u32) -> LpProblem {
    let variables = catalog.products().iter().map(|p| p.name.clone()).collect();
    let mut problem = LpProblem::new(variables);
    problem.set_objective(catalog.prices(), false);

    for (i, resource) in catalog.resources().iter().enumerate() {
        let coefficients = catalog.matrix().row(i).iter().map(|&c| f64::from(c)).collect();
        problem.add_constraint(
            resource.name.clone(),
            coefficients,
            ConstraintOp::Le,
            resource.availability as f64,
        );
    }

    problem.set_uniform_lower_bound(f64::from(minimum));
    problem
}
