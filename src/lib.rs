//! Resource-leveled scheduling for multiple concurrent projects.
//!
//! Each project is a set of precedence-linked activities with variable
//! duration drawing on shared, capacity-limited renewable resources.
//! The crate translates a validated [`ParameterSet`] into a
//! mixed-integer linear program, hands it to a pluggable
//! [`SolverAdapter`] backend, and translates the solved assignment back
//! into a structured [`LevelingReport`] of schedule, lateness and
//! resource usage. The objective minimizes a weighted blend of peak
//! resource consumption, per-activity lateness penalties and
//! duration-proportional cost.

// Domain layer: data model, MILP container, solver contract
pub mod domain;

// Application layer: model construction, result extraction, orchestration
pub mod application;

// Solver adapters: concrete implementations of SolverAdapter
#[cfg(any(feature = "cbc", feature = "highs"))]
pub mod solver;

// Re-export commonly used types
pub use application::{
    level, LatenessEntry, LevelError, LevelingReport, ModelBuilder, ResultExtractor, ScheduleEntry,
};

pub use domain::{
    ActivityKey, Assignment, Constraint, ConstraintType, Model, Objective, OptimizationType,
    ParameterSet, RequirementKey, SolveOutcome, SolveStats, SolveStatus, SolverAdapter,
    SolverBackend, SolverConfig, SolverError, ValidationError, VarId, VarIndex, Variable,
    VariableType,
};

#[cfg(any(feature = "cbc", feature = "highs"))]
pub use application::level_with_config;

#[cfg(any(feature = "cbc", feature = "highs"))]
pub use solver::SolverFactory;

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
