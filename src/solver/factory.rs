use crate::domain::{
    solver_adapter::{Result, SolverAdapter},
    value_objects::SolverBackend,
};
use std::sync::Arc;

#[cfg(not(all(feature = "cbc", feature = "highs")))]
use crate::domain::solver_adapter::SolverError;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend.
    ///
    /// Backends compiled out of this build are reported as unavailable
    /// rather than silently substituted.
    pub fn create(backend: SolverBackend) -> Result<Arc<dyn SolverAdapter>> {
        match backend {
            SolverBackend::Auto => Self::auto(),
            SolverBackend::CoinCbc => Self::cbc(),
            SolverBackend::Highs => Self::highs(),
        }
    }

    // Auto prefers HiGHS when it is compiled in
    #[cfg(feature = "highs")]
    fn auto() -> Result<Arc<dyn SolverAdapter>> {
        Self::highs()
    }

    #[cfg(not(feature = "highs"))]
    fn auto() -> Result<Arc<dyn SolverAdapter>> {
        Self::cbc()
    }

    #[cfg(feature = "cbc")]
    fn cbc() -> Result<Arc<dyn SolverAdapter>> {
        Ok(Arc::new(super::CoinCbcSolver::new()))
    }

    #[cfg(not(feature = "cbc"))]
    fn cbc() -> Result<Arc<dyn SolverAdapter>> {
        Err(SolverError::BackendUnavailable(
            SolverBackend::CoinCbc.to_string(),
        ))
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverAdapter>> {
        Ok(Arc::new(super::HighsSolver::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverAdapter>> {
        Err(SolverError::BackendUnavailable(
            SolverBackend::Highs.to_string(),
        ))
    }
}
