//! Output contract for one leveling request.

use crate::domain::value_objects::SolveStatus;
use serde::Serialize;
use std::collections::BTreeMap;

/// One scheduled activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub activity: String,
    pub project: String,
    pub start: u32,
    pub finish: u32,
    pub duration: u32,
}

/// Lateness beyond an activity's target finish, in periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatenessEntry {
    pub activity: String,
    pub project: String,
    pub days_late: f64,
}

/// Structured result of one optimization request.
///
/// Maps are ordered so serialized reports are stable across runs.
/// Periods where no resource is consumed at all are omitted from
/// `daily_usage`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelingReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_value: Option<f64>,
    pub schedule: Vec<ScheduleEntry>,
    pub lateness: Vec<LatenessEntry>,
    pub peak_resource_usage: BTreeMap<String, f64>,
    pub daily_usage: BTreeMap<u32, BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LevelingReport {
    /// Report for a solve that ended without an optimal assignment;
    /// carries the status and an error kind, no schedule content.
    pub fn failure(status: SolveStatus) -> Self {
        let error = match status {
            SolveStatus::Optimal => None,
            SolveStatus::Infeasible => {
                Some("no feasible schedule satisfies the constraints".to_string())
            }
            SolveStatus::Unbounded => Some("the objective is unbounded".to_string()),
            SolveStatus::TimedOut => {
                Some("the time limit was reached before an optimal schedule was proven".to_string())
            }
        };
        Self {
            status: status.to_string(),
            objective_value: None,
            schedule: Vec::new(),
            lateness: Vec::new(),
            peak_resource_usage: BTreeMap::new(),
            daily_usage: BTreeMap::new(),
            error,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal.to_string()
    }
}
