use super::keys::ActivityKey;
use super::value_objects::{ConstraintType, OptimizationType, SolverBackend, VariableType};
use std::time::Duration;

/// Index of a decision variable within a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Decision variable in the leveling program
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }
}

/// Linear constraint over sparse variable terms
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(VarId, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(VarId, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Objective function over sparse variable terms
#[derive(Debug, Clone)]
pub struct Objective {
    pub optimization_type: OptimizationType,
    pub terms: Vec<(VarId, f64)>,
}

impl Objective {
    pub fn minimize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            optimization_type: OptimizationType::Minimize,
            terms,
        }
    }
}

/// Maps the scheduling semantics onto flat variable ids.
///
/// Allocation order is fixed: the per-period activity indicators
/// (activity-major, period-minor), then the actual-duration, start and
/// finish blocks, the per-resource peak-usage block, and the lateness
/// block. Activities are ordered by project declaration order, then by
/// declaration order within the project; resources by declaration order.
#[derive(Debug, Clone)]
pub struct VarIndex {
    horizon: u32,
    activities: Vec<ActivityKey>,
    resources: Vec<String>,
}

impl VarIndex {
    pub fn new(horizon: u32, activities: Vec<ActivityKey>, resources: Vec<String>) -> Self {
        Self {
            horizon,
            activities,
            resources,
        }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn activities(&self) -> &[ActivityKey] {
        &self.activities
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn num_variables(&self) -> usize {
        let activities = self.activities.len();
        activities * self.horizon as usize + 4 * activities + self.resources.len()
    }

    /// Indicator: activity `a` consumes resources during period `t` (1-based).
    pub fn active(&self, a: usize, t: u32) -> VarId {
        VarId(a * self.horizon as usize + (t as usize - 1))
    }

    /// Number of periods activity `a` is active.
    pub fn actual_duration(&self, a: usize) -> VarId {
        VarId(self.activities.len() * self.horizon as usize + a)
    }

    /// First active period of activity `a`.
    pub fn start(&self, a: usize) -> VarId {
        VarId(self.activities.len() * (self.horizon as usize + 1) + a)
    }

    /// Last active period of activity `a`.
    pub fn finish(&self, a: usize) -> VarId {
        VarId(self.activities.len() * (self.horizon as usize + 2) + a)
    }

    /// Peak instantaneous consumption of resource `k` over the horizon.
    pub fn peak_usage(&self, k: usize) -> VarId {
        VarId(self.activities.len() * (self.horizon as usize + 3) + k)
    }

    /// Periods by which activity `a` finishes past its target.
    pub fn lateness(&self, a: usize) -> VarId {
        VarId(self.activities.len() * (self.horizon as usize + 3) + self.resources.len() + a)
    }
}

/// Complete mixed-integer program for one leveling request, together
/// with the index that ties variable ids back to scheduling semantics.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub objective: Objective,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    pub index: VarIndex,
}

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }
}

/// Per-request solver configuration, passed explicitly by the caller
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> VarIndex {
        VarIndex::new(
            4,
            vec![ActivityKey::new("A1", "J1"), ActivityKey::new("A2", "J1")],
            vec!["K1".to_string()],
        )
    }

    #[test]
    fn blocks_are_disjoint_and_dense() {
        let index = index();
        let mut seen = vec![false; index.num_variables()];
        for a in 0..2 {
            for t in 1..=4 {
                seen[index.active(a, t).0] = true;
            }
        }
        for a in 0..2 {
            seen[index.actual_duration(a).0] = true;
            seen[index.start(a).0] = true;
            seen[index.finish(a).0] = true;
            seen[index.lateness(a).0] = true;
        }
        seen[index.peak_usage(0).0] = true;
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn active_block_is_activity_major() {
        let index = index();
        assert_eq!(index.active(0, 1), VarId(0));
        assert_eq!(index.active(0, 4), VarId(3));
        assert_eq!(index.active(1, 1), VarId(4));
    }
}
