//! Validated input data for one leveling request.
//!
//! A `ParameterSet` is constructed once per optimization request and is
//! immutable afterwards. Validation runs before model construction and
//! reports the first offending key; no partial model is ever built from
//! a parameter set that fails these checks.

use super::keys::{ActivityKey, RequirementKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Complete input for one optimization request.
///
/// `projects` and `resources` fix the canonical iteration order; every
/// per-project and per-activity attribute lives in a keyed map so the
/// set stays close to the external payload shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub projects: Vec<String>,
    pub activities: HashMap<String, Vec<String>>,
    pub resources: Vec<String>,
    #[serde(default)]
    pub precedences: HashMap<String, Vec<(String, String)>>,
    #[serde(default)]
    pub resource_requirements: HashMap<RequirementKey, u32>,
    pub resource_weights: HashMap<String, f64>,
    pub earliest_start_times: HashMap<String, u32>,
    pub project_deadlines: HashMap<String, u32>,
    pub max_resource_capacity: HashMap<String, u32>,
    pub target_finish_times: HashMap<ActivityKey, u32>,
    pub lateness_penalties: HashMap<ActivityKey, u32>,
    pub min_durations: HashMap<ActivityKey, u32>,
    pub max_durations: HashMap<ActivityKey, u32>,
    pub time_periods: u32,
    pub cost_per_day: f64,
}

impl ParameterSet {
    /// Starts an empty parameter set over the given horizon.
    pub fn new(time_periods: u32, cost_per_day: f64) -> Self {
        Self {
            time_periods,
            cost_per_day,
            ..Self::default()
        }
    }

    /// Registers a project with the ingestion-layer defaults: earliest
    /// start at period 1, deadline at twice the horizon.
    pub fn with_project(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.earliest_start_times.insert(id.clone(), 1);
        self.project_deadlines
            .insert(id.clone(), self.time_periods * 2);
        self.activities.entry(id.clone()).or_default();
        self.projects.push(id);
        self
    }

    /// Overrides a project's time window.
    pub fn with_project_window(mut self, id: &str, earliest_start: u32, deadline: u32) -> Self {
        self.earliest_start_times.insert(id.to_string(), earliest_start);
        self.project_deadlines.insert(id.to_string(), deadline);
        self
    }

    /// Adds an activity with its duration bounds, target finish period
    /// and per-period lateness penalty.
    pub fn with_activity(
        mut self,
        project: &str,
        activity: &str,
        min_duration: u32,
        max_duration: u32,
        target_finish: u32,
        lateness_penalty: u32,
    ) -> Self {
        let key = ActivityKey::new(activity, project);
        self.activities
            .entry(project.to_string())
            .or_default()
            .push(activity.to_string());
        self.min_durations.insert(key.clone(), min_duration);
        self.max_durations.insert(key.clone(), max_duration);
        self.target_finish_times.insert(key.clone(), target_finish);
        self.lateness_penalties.insert(key, lateness_penalty);
        self
    }

    /// Adds a resource with its leveling weight and hard capacity.
    pub fn with_resource(mut self, id: &str, weight: f64, capacity: u32) -> Self {
        self.resources.push(id.to_string());
        self.resource_weights.insert(id.to_string(), weight);
        self.max_resource_capacity.insert(id.to_string(), capacity);
        self
    }

    /// Declares that `successor` may not start until `predecessor`
    /// finishes, within one project.
    pub fn with_precedence(mut self, project: &str, predecessor: &str, successor: &str) -> Self {
        self.precedences
            .entry(project.to_string())
            .or_default()
            .push((predecessor.to_string(), successor.to_string()));
        self
    }

    /// Declares how much of `resource` the activity consumes in every
    /// period it is active.
    pub fn with_requirement(
        mut self,
        activity: &str,
        project: &str,
        resource: &str,
        amount: u32,
    ) -> Self {
        self.resource_requirements
            .insert(RequirementKey::new(activity, project, resource), amount);
        self
    }

    /// Checks the structural preconditions of model construction.
    ///
    /// Returns the first violation found; scan order is deterministic
    /// (declaration order, with requirement keys sorted).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.time_periods == 0 {
            return Err(ValidationError::EmptyHorizon);
        }

        let mut project_ids = HashSet::new();
        for project in &self.projects {
            if !project_ids.insert(project.as_str()) {
                return Err(ValidationError::DuplicateProject(project.clone()));
            }
            if !self.activities.contains_key(project) {
                return Err(ValidationError::MissingActivities(project.clone()));
            }
            match self.earliest_start_times.get(project) {
                None => {
                    return Err(ValidationError::MissingProjectEntry(
                        project.clone(),
                        "earliest start",
                    ))
                }
                Some(&0) => return Err(ValidationError::EarliestStartOutOfRange(project.clone())),
                Some(_) => {}
            }
            if !self.project_deadlines.contains_key(project) {
                return Err(ValidationError::MissingProjectEntry(
                    project.clone(),
                    "deadline",
                ));
            }
        }

        let mut resource_ids = HashSet::new();
        for resource in &self.resources {
            if !resource_ids.insert(resource.as_str()) {
                return Err(ValidationError::DuplicateResource(resource.clone()));
            }
            if !self.resource_weights.contains_key(resource) {
                return Err(ValidationError::MissingResourceEntry(
                    resource.clone(),
                    "weight",
                ));
            }
            if !self.max_resource_capacity.contains_key(resource) {
                return Err(ValidationError::MissingResourceEntry(
                    resource.clone(),
                    "capacity",
                ));
            }
        }

        let mut activity_keys = HashSet::new();
        for project in &self.projects {
            for activity in &self.activities[project] {
                let key = ActivityKey::new(activity.as_str(), project.as_str());
                if !activity_keys.insert(key.clone()) {
                    return Err(ValidationError::DuplicateActivity(key));
                }
                let min = match self.min_durations.get(&key) {
                    Some(&min) => min,
                    None => return Err(ValidationError::MissingActivityEntry(key, "min duration")),
                };
                let max = match self.max_durations.get(&key) {
                    Some(&max) => max,
                    None => return Err(ValidationError::MissingActivityEntry(key, "max duration")),
                };
                if min > max {
                    return Err(ValidationError::DurationBounds { key, min, max });
                }
                if !self.target_finish_times.contains_key(&key) {
                    return Err(ValidationError::MissingActivityEntry(key, "target finish"));
                }
                if !self.lateness_penalties.contains_key(&key) {
                    return Err(ValidationError::MissingActivityEntry(
                        key,
                        "lateness penalty",
                    ));
                }
            }
        }

        let mut requirements: Vec<&RequirementKey> = self.resource_requirements.keys().collect();
        requirements.sort();
        for requirement in requirements {
            if !activity_keys.contains(&requirement.activity_key()) {
                return Err(ValidationError::RequirementUnknownActivity(
                    requirement.clone(),
                ));
            }
            if !resource_ids.contains(requirement.resource.as_str()) {
                return Err(ValidationError::RequirementUnknownResource(
                    requirement.clone(),
                ));
            }
        }

        let mut precedence_projects: Vec<&String> = self.precedences.keys().collect();
        precedence_projects.sort();
        for project in precedence_projects {
            if !project_ids.contains(project.as_str()) {
                return Err(ValidationError::UnknownPrecedenceProject(project.clone()));
            }
            let declared: HashSet<&str> = self.activities[project]
                .iter()
                .map(String::as_str)
                .collect();
            for (predecessor, successor) in &self.precedences[project] {
                if !declared.contains(predecessor.as_str())
                    || !declared.contains(successor.as_str())
                {
                    return Err(ValidationError::DanglingPrecedence {
                        project: project.clone(),
                        predecessor: predecessor.clone(),
                        successor: successor.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Malformed or inconsistent parameter set, reported before any model
/// construction takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("time horizon must contain at least one period")]
    EmptyHorizon,

    #[error("duplicate project id '{0}'")]
    DuplicateProject(String),

    #[error("project '{0}' has no activity list")]
    MissingActivities(String),

    #[error("project '{0}' is missing a {1} entry")]
    MissingProjectEntry(String, &'static str),

    #[error("project '{0}' earliest start must be at least period 1")]
    EarliestStartOutOfRange(String),

    #[error("duplicate resource id '{0}'")]
    DuplicateResource(String),

    #[error("resource '{0}' is missing a {1} entry")]
    MissingResourceEntry(String, &'static str),

    #[error("duplicate activity {0}")]
    DuplicateActivity(ActivityKey),

    #[error("activity {0} is missing a {1} entry")]
    MissingActivityEntry(ActivityKey, &'static str),

    #[error("activity {key} has min duration {min} greater than max duration {max}")]
    DurationBounds {
        key: ActivityKey,
        min: u32,
        max: u32,
    },

    #[error("resource requirement {0} references an undeclared activity")]
    RequirementUnknownActivity(RequirementKey),

    #[error("resource requirement {0} references an undeclared resource")]
    RequirementUnknownResource(RequirementKey),

    #[error("precedences reference undeclared project '{0}'")]
    UnknownPrecedenceProject(String),

    #[error(
        "precedence ({predecessor}, {successor}) in project '{project}' references an undeclared activity"
    )]
    DanglingPrecedence {
        project: String,
        predecessor: String,
        successor: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterSet {
        ParameterSet::new(8, 0.5)
            .with_project("J1")
            .with_activity("J1", "A1", 1, 3, 4, 10)
            .with_activity("J1", "A2", 2, 2, 6, 5)
            .with_resource("K1", 1.0, 10)
            .with_precedence("J1", "A1", "A2")
            .with_requirement("A1", "J1", "K1", 2)
    }

    #[test]
    fn valid_set_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn project_defaults_follow_ingestion_contract() {
        let params = sample();
        assert_eq!(params.earliest_start_times["J1"], 1);
        assert_eq!(params.project_deadlines["J1"], 16);
    }

    #[test]
    fn empty_horizon_rejected() {
        let params = ParameterSet::new(0, 0.0).with_project("J1");
        assert_eq!(params.validate(), Err(ValidationError::EmptyHorizon));
    }

    #[test]
    fn duplicate_activity_rejected() {
        let params = sample().with_activity("J1", "A1", 1, 1, 2, 1);
        assert_eq!(
            params.validate(),
            Err(ValidationError::DuplicateActivity(ActivityKey::new(
                "A1", "J1"
            )))
        );
    }

    #[test]
    fn min_duration_above_max_rejected() {
        let mut params = sample();
        params
            .min_durations
            .insert(ActivityKey::new("A2", "J1"), 5);
        assert_eq!(
            params.validate(),
            Err(ValidationError::DurationBounds {
                key: ActivityKey::new("A2", "J1"),
                min: 5,
                max: 2,
            })
        );
    }

    #[test]
    fn missing_target_finish_rejected() {
        let mut params = sample();
        params
            .target_finish_times
            .remove(&ActivityKey::new("A1", "J1"));
        assert_eq!(
            params.validate(),
            Err(ValidationError::MissingActivityEntry(
                ActivityKey::new("A1", "J1"),
                "target finish"
            ))
        );
    }

    #[test]
    fn requirement_against_unknown_activity_rejected() {
        let params = sample().with_requirement("A9", "J1", "K1", 1);
        assert_eq!(
            params.validate(),
            Err(ValidationError::RequirementUnknownActivity(
                RequirementKey::new("A9", "J1", "K1")
            ))
        );
    }

    #[test]
    fn requirement_against_unknown_resource_rejected() {
        let params = sample().with_requirement("A1", "J1", "K9", 1);
        assert_eq!(
            params.validate(),
            Err(ValidationError::RequirementUnknownResource(
                RequirementKey::new("A1", "J1", "K9")
            ))
        );
    }

    #[test]
    fn dangling_precedence_rejected() {
        let params = sample().with_precedence("J1", "A1", "A9");
        assert_eq!(
            params.validate(),
            Err(ValidationError::DanglingPrecedence {
                project: "J1".to_string(),
                predecessor: "A1".to_string(),
                successor: "A9".to_string(),
            })
        );
    }

    #[test]
    fn precedence_in_undeclared_project_rejected() {
        let params = sample().with_precedence("J9", "A1", "A2");
        assert_eq!(
            params.validate(),
            Err(ValidationError::UnknownPrecedenceProject("J9".to_string()))
        );
    }

    #[test]
    fn zero_earliest_start_rejected() {
        let params = sample().with_project_window("J1", 0, 16);
        assert_eq!(
            params.validate(),
            Err(ValidationError::EarliestStartOutOfRange("J1".to_string()))
        );
    }

    #[test]
    fn missing_resource_capacity_rejected() {
        let mut params = sample();
        params.max_resource_capacity.remove("K1");
        assert_eq!(
            params.validate(),
            Err(ValidationError::MissingResourceEntry(
                "K1".to_string(),
                "capacity"
            ))
        );
    }
}
