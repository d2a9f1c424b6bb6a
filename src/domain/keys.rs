// Composite identifier types used as map keys across the crate.
// Activity ids are only unique within their owning project, so every
// lookup carries the project id instead of a string-joined compound id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an activity within its owning project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityKey {
    pub activity: String,
    pub project: String,
}

impl ActivityKey {
    pub fn new(activity: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            project: project.into(),
        }
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.activity)
    }
}

/// Identifies one (activity, resource) requirement entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequirementKey {
    pub activity: String,
    pub project: String,
    pub resource: String,
}

impl RequirementKey {
    pub fn new(
        activity: impl Into<String>,
        project: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            project: project.into(),
            resource: resource.into(),
        }
    }

    /// The activity this requirement belongs to.
    pub fn activity_key(&self) -> ActivityKey {
        ActivityKey::new(self.activity.as_str(), self.project.as_str())
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.project, self.activity, self.resource)
    }
}
