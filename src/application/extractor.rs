//! Converts a solved variable assignment back into the report contract.

use super::report::{LatenessEntry, LevelingReport, ScheduleEntry};
use crate::domain::keys::ActivityKey;
use crate::domain::model::Model;
use crate::domain::parameters::ParameterSet;
use crate::domain::solver_adapter::SolveOutcome;
use std::collections::{BTreeMap, HashMap};

/// Lateness at or below this threshold is treated as solver noise.
const LATENESS_TOLERANCE: f64 = 0.01;

/// Builds the structured schedule/usage report from a solve outcome.
pub struct ResultExtractor;

impl ResultExtractor {
    pub fn extract(params: &ParameterSet, model: &Model, outcome: &SolveOutcome) -> LevelingReport {
        if !outcome.is_optimal() {
            return LevelingReport::failure(outcome.status);
        }
        let Some(assignment) = outcome.assignment.as_ref() else {
            return LevelingReport::failure(outcome.status);
        };

        let index = &model.index;

        let mut schedule = Vec::with_capacity(index.activities().len());
        let mut lateness = Vec::new();
        for (a, key) in index.activities().iter().enumerate() {
            schedule.push(ScheduleEntry {
                activity: key.activity.clone(),
                project: key.project.clone(),
                start: round_period(assignment[index.start(a).0]),
                finish: round_period(assignment[index.finish(a).0]),
                duration: round_period(assignment[index.actual_duration(a).0]),
            });
            let late = assignment[index.lateness(a).0];
            if late > LATENESS_TOLERANCE {
                lateness.push(LatenessEntry {
                    activity: key.activity.clone(),
                    project: key.project.clone(),
                    days_late: round_two_decimals(late),
                });
            }
        }

        let mut peak_resource_usage = BTreeMap::new();
        for (k, resource) in index.resources().iter().enumerate() {
            peak_resource_usage.insert(resource.clone(), assignment[index.peak_usage(k).0]);
        }

        LevelingReport {
            status: outcome.status.to_string(),
            objective_value: outcome.objective_value,
            schedule,
            lateness,
            peak_resource_usage,
            daily_usage: Self::daily_usage(params, model, assignment),
            error: None,
        }
    }

    /// Per-period consumption of every resource, recomputed from the
    /// requirements and the activity indicators. Periods with zero
    /// usage across all resources are omitted.
    fn daily_usage(
        params: &ParameterSet,
        model: &Model,
        assignment: &[f64],
    ) -> BTreeMap<u32, BTreeMap<String, f64>> {
        let index = &model.index;
        let positions: HashMap<ActivityKey, usize> = index
            .activities()
            .iter()
            .enumerate()
            .map(|(a, key)| (key.clone(), a))
            .collect();
        let requirements: Vec<(usize, &str, f64)> = params
            .resource_requirements
            .iter()
            .map(|(requirement, &amount)| {
                (
                    positions[&requirement.activity_key()],
                    requirement.resource.as_str(),
                    f64::from(amount),
                )
            })
            .collect();

        let mut daily_usage = BTreeMap::new();
        for t in 1..=index.horizon() {
            let mut usage: BTreeMap<String, f64> = index
                .resources()
                .iter()
                .map(|resource| (resource.clone(), 0.0))
                .collect();
            for &(a, resource, amount) in &requirements {
                if assignment[index.active(a, t).0] > 0.5 {
                    if let Some(total) = usage.get_mut(resource) {
                        *total += amount;
                    }
                }
            }
            if usage.values().any(|&total| total > 0.0) {
                daily_usage.insert(t, usage);
            }
        }
        daily_usage
    }
}

fn round_period(value: f64) -> u32 {
    value.round() as u32
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
