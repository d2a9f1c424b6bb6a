// Contract between the leveling core and external MILP backends.
// The formulation never depends on which backend executes it, so
// concrete solvers are swappable behind this interface.

use super::model::Model;
use super::value_objects::SolveStatus;
use std::time::Duration;

/// Error types for the solver boundary
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("solver backend not available: {0}")]
    BackendUnavailable(String),

    #[error("solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Values for every declared variable, indexed by `VarId`.
pub type Assignment = Vec<f64>;

/// Size and timing counters for one solve call
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

/// Outcome of one backend invocation.
///
/// `objective_value` and `assignment` are present iff the status is
/// [`SolveStatus::Optimal`].
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub assignment: Option<Assignment>,
    pub stats: SolveStats,
}

impl SolveOutcome {
    pub fn optimal(objective_value: f64, assignment: Assignment) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            assignment: Some(assignment),
            stats: SolveStats::default(),
        }
    }

    /// Non-optimal outcome carrying no variable values.
    pub fn status_only(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignment: None,
            stats: SolveStats::default(),
        }
    }

    pub fn with_stats(mut self, stats: SolveStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Narrow interface to an external MILP solving capability.
///
/// Implementations must be stateless per invocation: concurrent calls
/// may not share mutable solver state, nothing is retried internally,
/// and the only cancellation mechanism is the explicit `time_limit`.
/// Identical models must reproduce the optimal objective value; the
/// assignment may legitimately differ between equal-cost optima, so
/// callers must not depend on a particular tie-broken schedule.
pub trait SolverAdapter: Send + Sync {
    /// Solve the model, reporting the outcome or a backend failure.
    fn solve(&self, model: &Model, time_limit: Option<Duration>) -> Result<SolveOutcome>;

    /// Structural checks before handing the model to the backend.
    fn check(&self, model: &Model) -> Result<()> {
        let num_vars = model.num_variables();

        for &(id, _) in &model.objective.terms {
            if id.0 >= num_vars {
                return Err(SolverError::InvalidModel(format!(
                    "objective references undeclared variable {}",
                    id.0
                )));
            }
        }

        for constraint in &model.constraints {
            for &(id, _) in &constraint.terms {
                if id.0 >= num_vars {
                    return Err(SolverError::InvalidModel(format!(
                        "constraint '{}' references undeclared variable {}",
                        constraint.name, id.0
                    )));
                }
            }
        }

        for variable in &model.variables {
            if let Some(upper) = variable.upper_bound {
                if variable.lower_bound > upper {
                    return Err(SolverError::InvalidModel(format!(
                        "variable '{}' has lower bound {} above upper bound {}",
                        variable.name, variable.lower_bound, upper
                    )));
                }
            }
        }

        Ok(())
    }

    /// Name of this solver backend.
    fn name(&self) -> &str;
}
