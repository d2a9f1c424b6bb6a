// HiGHS solver adapter: translates the leveling model to the HiGHS API

use crate::domain::{
    model::Model,
    solver_adapter::{Result, SolveOutcome, SolveStats, SolverAdapter, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolveStatus, VariableType},
};
use std::time::{Duration, Instant};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for HighsSolver {
    fn solve(&self, model: &Model, time_limit: Option<Duration>) -> Result<SolveOutcome> {
        self.check(model)?;

        let start_time = Instant::now();
        let num_vars = model.num_variables();

        let num_integer = model
            .variables
            .iter()
            .filter(|v| matches!(v.variable_type, VariableType::Integer))
            .count() as u32;
        let num_binary = model
            .variables
            .iter()
            .filter(|v| matches!(v.variable_type, VariableType::Binary))
            .count() as u32;

        // HiGHS wants the objective coefficient at column creation time
        let mut objective = vec![0.0; num_vars];
        for &(id, coeff) in &model.objective.terms {
            objective[id.0] += coeff;
        }

        // Use HiGHS RowProblem (add variables first, then constraints)
        use highs::{HighsModelStatus, RowProblem, Sense};

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(num_vars);

        for (i, var_def) in model.variables.iter().enumerate() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(objective[i], lower..upper)
                }
                VariableType::Continuous => pb.add_column(objective[i], lower..upper),
            };
            cols.push(col);
        }

        for constraint in &model.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|&&(_, coeff)| coeff != 0.0)
                .map(|&(id, coeff)| (cols[id.0], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if model.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut highs_model = pb.optimise(sense);
        if let Some(limit) = time_limit {
            highs_model.set_option("time_limit", limit.as_secs_f64());
        }

        let solved = highs_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        let stats = SolveStats {
            solve_time_ms: solve_time,
            num_variables: num_vars as u32,
            num_constraints: model.constraints.len() as u32,
            num_integer_vars: num_integer,
            num_binary_vars: num_binary,
        };

        tracing::debug!(solver = self.name(), time_ms = solve_time, "backend finished");

        match solved.status() {
            HighsModelStatus::Optimal => {
                let assignment = solved.get_solution().columns().to_vec();

                let objective_value: f64 = model
                    .objective
                    .terms
                    .iter()
                    .map(|&(id, coeff)| coeff * assignment[id.0])
                    .sum();

                Ok(SolveOutcome::optimal(objective_value, assignment).with_stats(stats))
            }
            HighsModelStatus::Infeasible => {
                Ok(SolveOutcome::status_only(SolveStatus::Infeasible).with_stats(stats))
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(SolveOutcome::status_only(SolveStatus::Unbounded).with_stats(stats))
            }
            HighsModelStatus::ReachedTimeLimit => {
                Ok(SolveOutcome::status_only(SolveStatus::TimedOut).with_stats(stats))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
