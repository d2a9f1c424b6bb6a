// Application layer: model construction, result extraction and the
// request orchestration that ties them to a solver backend.

pub mod builder;
pub mod extractor;
pub mod report;

pub use builder::ModelBuilder;
pub use extractor::ResultExtractor;
pub use report::{LatenessEntry, LevelingReport, ScheduleEntry};

use crate::domain::parameters::{ParameterSet, ValidationError};
use crate::domain::solver_adapter::{SolverAdapter, SolverError};
use std::time::Duration;

/// Top-level failure of a leveling request.
///
/// Solver-reported outcomes (infeasible, unbounded, timed out) are not
/// errors; they surface as a structured [`LevelingReport`]. Only
/// malformed input and backend failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Runs one complete leveling request: build, solve, extract.
///
/// Pure with respect to ambient state: everything the request needs is
/// in `params`, the adapter and the time limit, so identical inputs
/// reproduce the same objective value and retries are idempotent.
pub fn level(
    params: &ParameterSet,
    solver: &dyn SolverAdapter,
    time_limit: Option<Duration>,
) -> Result<LevelingReport, LevelError> {
    let model = ModelBuilder::build(params)?;
    tracing::info!(
        solver = solver.name(),
        variables = model.num_variables(),
        constraints = model.constraints.len(),
        "solving leveling model"
    );
    let outcome = solver.solve(&model, time_limit)?;
    tracing::info!(status = %outcome.status, objective = ?outcome.objective_value, "solve finished");
    Ok(ResultExtractor::extract(params, &model, &outcome))
}

/// Convenience entry point that picks the backend from a config.
#[cfg(any(feature = "cbc", feature = "highs"))]
pub fn level_with_config(
    params: &ParameterSet,
    config: &crate::domain::model::SolverConfig,
) -> Result<LevelingReport, LevelError> {
    let solver = crate::solver::SolverFactory::create(config.backend)?;
    level(params, solver.as_ref(), config.time_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Model;
    use crate::domain::solver_adapter::{Result as SolverResult, SolveOutcome};
    use crate::domain::value_objects::SolveStatus;

    struct CannedSolver(SolveStatus);

    impl SolverAdapter for CannedSolver {
        fn solve(&self, _model: &Model, _time_limit: Option<Duration>) -> SolverResult<SolveOutcome> {
            Ok(SolveOutcome::status_only(self.0))
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    struct UnreachableSolver;

    impl SolverAdapter for UnreachableSolver {
        fn solve(&self, _model: &Model, _time_limit: Option<Duration>) -> SolverResult<SolveOutcome> {
            unreachable!("validation must fail before the solver is invoked")
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn params() -> ParameterSet {
        ParameterSet::new(4, 0.1)
            .with_project("J1")
            .with_activity("J1", "A1", 1, 2, 3, 5)
            .with_resource("K1", 1.0, 4)
            .with_requirement("A1", "J1", "K1", 2)
    }

    #[test]
    fn validation_failures_never_reach_the_solver() {
        let mut bad = params();
        bad.max_durations.clear();
        let result = level(&bad, &UnreachableSolver, None);
        assert!(matches!(result, Err(LevelError::Validation(_))));
    }

    #[test]
    fn solver_reported_infeasibility_is_a_structured_report() {
        let report = level(&params(), &CannedSolver(SolveStatus::Infeasible), None).unwrap();
        assert_eq!(report.status, "Infeasible");
        assert!(report.schedule.is_empty());
        assert!(report.error.is_some());
    }
}
