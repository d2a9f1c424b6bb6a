//! Translates a validated [`ParameterSet`] into the leveling MILP.
//!
//! The formulation follows the multi-project resource-leveling model:
//! per-period binary activity indicators, integer start/finish/duration
//! variables linked through big-M inequalities, continuous peak-usage
//! and lateness variables, and a single minimization objective blending
//! weighted peak usage, lateness penalties and duration cost.

use crate::domain::keys::ActivityKey;
use crate::domain::model::{Constraint, Model, Objective, VarId, VarIndex, Variable};
use crate::domain::parameters::{ParameterSet, ValidationError};
use crate::domain::value_objects::ConstraintType;
use std::collections::HashMap;

/// Slack added to the horizon length when forming the big-M constant.
const BIG_M_MARGIN: u32 = 100;

/// Builds decision variables, constraints and the objective from a
/// validated parameter set.
pub struct ModelBuilder;

impl ModelBuilder {
    /// Validates `params` and constructs the complete model.
    ///
    /// Validation failures are returned before any variable is created;
    /// a partial model is never observable.
    pub fn build(params: &ParameterSet) -> Result<Model, ValidationError> {
        params.validate()?;

        let horizon = params.time_periods;
        let big_m = f64::from(horizon + BIG_M_MARGIN);

        let activities: Vec<ActivityKey> = params
            .projects
            .iter()
            .flat_map(|project| {
                params.activities[project]
                    .iter()
                    .map(|activity| ActivityKey::new(activity.as_str(), project.as_str()))
            })
            .collect();
        let index = VarIndex::new(horizon, activities, params.resources.clone());

        let variables = Self::declare_variables(&index);
        let objective = Self::objective(params, &index);
        let constraints = Self::constraints(params, &index, big_m);

        tracing::debug!(
            activities = index.activities().len(),
            resources = index.resources().len(),
            horizon,
            variables = variables.len(),
            constraints = constraints.len(),
            "built resource leveling model"
        );

        Ok(Model {
            name: "multi_project_resource_leveling".to_string(),
            objective,
            variables,
            constraints,
            index,
        })
    }

    /// Declares every variable in [`VarIndex`] allocation order.
    fn declare_variables(index: &VarIndex) -> Vec<Variable> {
        let mut variables = Vec::with_capacity(index.num_variables());
        for key in index.activities() {
            for t in 1..=index.horizon() {
                variables.push(Variable::binary(format!("active_{key}_t{t}")));
            }
        }
        for key in index.activities() {
            variables.push(Variable::integer(format!("dur_{key}")).with_bounds(1.0, None));
        }
        for key in index.activities() {
            variables.push(Variable::integer(format!("start_{key}")).with_bounds(1.0, None));
        }
        for key in index.activities() {
            variables.push(Variable::integer(format!("finish_{key}")).with_bounds(1.0, None));
        }
        for resource in index.resources() {
            variables.push(Variable::continuous(format!("peak_{resource}")));
        }
        for key in index.activities() {
            variables.push(Variable::continuous(format!("late_{key}")));
        }
        variables
    }

    /// Minimize weighted peak usage + lateness penalties + duration cost.
    fn objective(params: &ParameterSet, index: &VarIndex) -> Objective {
        let mut terms = Vec::new();
        for (k, resource) in index.resources().iter().enumerate() {
            terms.push((index.peak_usage(k), params.resource_weights[resource]));
        }
        for (a, key) in index.activities().iter().enumerate() {
            terms.push((
                index.lateness(a),
                f64::from(params.lateness_penalties[key]),
            ));
        }
        for a in 0..index.activities().len() {
            terms.push((index.actual_duration(a), params.cost_per_day));
        }
        Objective::minimize(terms)
    }

    fn constraints(params: &ParameterSet, index: &VarIndex, big_m: f64) -> Vec<Constraint> {
        let horizon = index.horizon();
        let activities = index.activities();
        let resources = index.resources();

        let positions: HashMap<ActivityKey, usize> = activities
            .iter()
            .enumerate()
            .map(|(a, key)| (key.clone(), a))
            .collect();

        let mut constraints = Vec::new();

        // Precedence: successor may not start until predecessor finishes.
        for project in &params.projects {
            let Some(pairs) = params.precedences.get(project) else {
                continue;
            };
            for (predecessor, successor) in pairs {
                let pred_key = ActivityKey::new(predecessor.as_str(), project.as_str());
                let succ_key = ActivityKey::new(successor.as_str(), project.as_str());
                let p = positions[&pred_key];
                let s = positions[&succ_key];
                constraints.push(
                    Constraint::new(
                        ConstraintType::GreaterThanOrEqual,
                        vec![(index.start(s), 1.0), (index.finish(p), -1.0)],
                        1.0,
                    )
                    .with_name(format!("precedence_{pred_key}_{succ_key}")),
                );
            }
        }

        // Start/finish linkage to the per-period indicators. The big-M
        // term makes each inequality vacuous for inactive periods, so
        // Start is bounded above by the earliest active period and
        // Finish below by the latest one.
        for (a, key) in activities.iter().enumerate() {
            for t in 1..=horizon {
                let period = f64::from(t);
                constraints.push(
                    Constraint::new(
                        ConstraintType::LessThanOrEqual,
                        vec![(index.start(a), 1.0), (index.active(a, t), big_m - period)],
                        big_m,
                    )
                    .with_name(format!("start_linkage_{key}_t{t}")),
                );
                constraints.push(
                    Constraint::new(
                        ConstraintType::GreaterThanOrEqual,
                        vec![
                            (index.finish(a), 1.0),
                            (index.active(a, t), -(big_m + period)),
                        ],
                        -big_m,
                    )
                    .with_name(format!("finish_linkage_{key}_t{t}")),
                );
            }
        }

        // Project time window.
        for (a, key) in activities.iter().enumerate() {
            let earliest = f64::from(params.earliest_start_times[&key.project]);
            let deadline = f64::from(params.project_deadlines[&key.project]);
            constraints.push(
                Constraint::new(
                    ConstraintType::GreaterThanOrEqual,
                    vec![(index.start(a), 1.0)],
                    earliest,
                )
                .with_name(format!("window_start_{key}")),
            );
            constraints.push(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    vec![(index.finish(a), 1.0)],
                    deadline,
                )
                .with_name(format!("window_finish_{key}")),
            );
        }

        // Duration: indicator count, finish/start linkage, bounds.
        for (a, key) in activities.iter().enumerate() {
            let mut count_terms: Vec<(VarId, f64)> =
                (1..=horizon).map(|t| (index.active(a, t), 1.0)).collect();
            count_terms.push((index.actual_duration(a), -1.0));
            constraints.push(
                Constraint::new(ConstraintType::Equal, count_terms, 0.0)
                    .with_name(format!("duration_count_{key}")),
            );
            constraints.push(
                Constraint::new(
                    ConstraintType::Equal,
                    vec![
                        (index.finish(a), 1.0),
                        (index.start(a), -1.0),
                        (index.actual_duration(a), -1.0),
                    ],
                    -1.0,
                )
                .with_name(format!("finish_start_link_{key}")),
            );
            constraints.push(
                Constraint::new(
                    ConstraintType::GreaterThanOrEqual,
                    vec![(index.actual_duration(a), 1.0)],
                    f64::from(params.min_durations[key]),
                )
                .with_name(format!("min_duration_{key}")),
            );
            constraints.push(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    vec![(index.actual_duration(a), 1.0)],
                    f64::from(params.max_durations[key]),
                )
                .with_name(format!("max_duration_{key}")),
            );
        }

        // Peak usage dominates consumption in every period.
        let requirements = Self::requirement_matrix(params, &positions, resources.len());
        for (k, resource) in resources.iter().enumerate() {
            for t in 1..=horizon {
                let mut terms: Vec<(VarId, f64)> = (0..activities.len())
                    .filter_map(|a| {
                        let amount = requirements[a * resources.len() + k];
                        (amount != 0.0).then_some((index.active(a, t), amount))
                    })
                    .collect();
                terms.push((index.peak_usage(k), -1.0));
                constraints.push(
                    Constraint::new(ConstraintType::LessThanOrEqual, terms, 0.0)
                        .with_name(format!("peak_usage_{resource}_t{t}")),
                );
            }
        }

        // Hard capacity on each peak.
        for (k, resource) in resources.iter().enumerate() {
            constraints.push(
                Constraint::new(
                    ConstraintType::LessThanOrEqual,
                    vec![(index.peak_usage(k), 1.0)],
                    f64::from(params.max_resource_capacity[resource]),
                )
                .with_name(format!("capacity_{resource}")),
            );
        }

        // Lateness lower bound against the target finish; the variable
        // domain pins it at zero and the positive objective coefficient
        // keeps the optimizer from inflating it.
        for (a, key) in activities.iter().enumerate() {
            let target = f64::from(params.target_finish_times[key]);
            constraints.push(
                Constraint::new(
                    ConstraintType::GreaterThanOrEqual,
                    vec![(index.lateness(a), 1.0), (index.finish(a), -1.0)],
                    -target,
                )
                .with_name(format!("lateness_{key}")),
            );
        }

        constraints
    }

    /// Dense activity-by-resource requirement lookup; absent entries
    /// mean zero consumption.
    fn requirement_matrix(
        params: &ParameterSet,
        positions: &HashMap<ActivityKey, usize>,
        num_resources: usize,
    ) -> Vec<f64> {
        let resource_positions: HashMap<&str, usize> = params
            .resources
            .iter()
            .enumerate()
            .map(|(k, resource)| (resource.as_str(), k))
            .collect();
        let mut matrix = vec![0.0; positions.len() * num_resources];
        for (requirement, &amount) in &params.resource_requirements {
            let a = positions[&requirement.activity_key()];
            let k = resource_positions[requirement.resource.as_str()];
            matrix[a * num_resources + k] = f64::from(amount);
        }
        matrix
    }
}
