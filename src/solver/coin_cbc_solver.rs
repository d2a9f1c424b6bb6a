use crate::domain::{
    model::Model,
    solver_adapter::{Result, SolveOutcome, SolveStats, SolverAdapter, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolveStatus, VariableType},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::{Duration, Instant};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for CoinCbcSolver {
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

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

        for var_def in &model.variables {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary | VariableType::Integer => {
                    vars.add(variable().integer().min(lower).max(upper))
                }
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            };
            lp_variables.push(var);
        }

        // Build objective expression from the sparse terms
        let mut obj_expr: Expression = 0.into();
        for &(id, coeff) in &model.objective.terms {
            if coeff != 0.0 {
                obj_expr += coeff * lp_variables[id.0];
            }
        }

        let unsolved = match model.objective.optimization_type {
            OptimizationType::Minimize => vars.minimise(obj_expr),
            OptimizationType::Maximize => vars.maximise(obj_expr),
        };
        let mut lp_model = unsolved.using(coin_cbc::coin_cbc);

        if let Some(limit) = time_limit {
            lp_model.set_parameter("sec", &limit.as_secs().max(1).to_string());
        }

        // Build constraints
        for constraint in &model.constraints {
            let mut lhs: Expression = 0.into();
            for &(id, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[id.0];
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(constraint.bound));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(constraint.bound));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(constraint.bound));
                }
            }
        }

        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;

        let stats = SolveStats {
            solve_time_ms: solve_time,
            num_variables: num_vars as u32,
            num_constraints: model.constraints.len() as u32,
            num_integer_vars: num_integer,
            num_binary_vars: num_binary,
        };

        tracing::debug!(solver = self.name(), time_ms = solve_time, "backend finished");

        match solution_result {
            Ok(sol) => {
                let assignment: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();

                // Recompute the objective from our own coefficients
                let objective_value: f64 = model
                    .objective
                    .terms
                    .iter()
                    .map(|&(id, coeff)| coeff * assignment[id.0])
                    .sum();

                Ok(SolveOutcome::optimal(objective_value, assignment).with_stats(stats))
            }
            Err(ResolutionError::Infeasible) => {
                Ok(SolveOutcome::status_only(SolveStatus::Infeasible).with_stats(stats))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(SolveOutcome::status_only(SolveStatus::Unbounded).with_stats(stats))
            }
            // CBC reports an exhausted time budget as a stopped run
            // rather than a distinct status
            Err(_) if time_limit.is_some() => {
                Ok(SolveOutcome::status_only(SolveStatus::TimedOut).with_stats(stats))
            }
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
