//! End-to-end leveling scenarios against the CBC backend.

#![cfg(feature = "cbc")]

use levelopt::{level, CoinCbcSolver, ModelBuilder, ParameterSet, SolveStatus, SolverAdapter};

/// Four concurrent projects sharing two resources over a 10-period
/// horizon, tight capacities, mixed penalties.
fn four_project_params() -> ParameterSet {
    ParameterSet::new(10, 0.1)
        .with_project("J1")
        .with_project("J2")
        .with_project("J3")
        .with_project("J4")
        .with_activity("J1", "A11", 2, 5, 3, 10)
        .with_activity("J1", "A12", 3, 6, 6, 1000)
        .with_activity("J1", "A13", 1, 3, 7, 2)
        .with_activity("J2", "A21", 3, 7, 5, 8)
        .with_activity("J2", "A22", 2, 4, 5, 5000)
        .with_activity("J3", "A31", 2, 4, 4, 5)
        .with_activity("J3", "A32", 3, 5, 8, 50)
        .with_activity("J3", "A33", 1, 2, 10, 10)
        .with_activity("J4", "A41", 2, 4, 5, 15)
        .with_activity("J4", "A42", 3, 5, 9, 750)
        .with_resource("K1", 0.6, 12)
        .with_resource("K2", 0.4, 15)
        .with_precedence("J1", "A11", "A12")
        .with_precedence("J2", "A21", "A22")
        .with_precedence("J3", "A31", "A32")
        .with_precedence("J4", "A41", "A42")
        .with_requirement("A11", "J1", "K1", 2)
        .with_requirement("A11", "J1", "K2", 1)
        .with_requirement("A12", "J1", "K1", 1)
        .with_requirement("A12", "J1", "K2", 3)
        .with_requirement("A13", "J1", "K1", 3)
        .with_requirement("A13", "J1", "K2", 2)
        .with_requirement("A21", "J2", "K1", 4)
        .with_requirement("A21", "J2", "K2", 2)
        .with_requirement("A22", "J2", "K1", 2)
        .with_requirement("A22", "J2", "K2", 4)
        .with_requirement("A31", "J3", "K1", 3)
        .with_requirement("A31", "J3", "K2", 1)
        .with_requirement("A32", "J3", "K1", 2)
        .with_requirement("A32", "J3", "K2", 3)
        .with_requirement("A33", "J3", "K1", 1)
        .with_requirement("A33", "J3", "K2", 2)
        .with_requirement("A41", "J4", "K1", 2)
        .with_requirement("A41", "J4", "K2", 1)
        .with_requirement("A42", "J4", "K1", 3)
        .with_requirement("A42", "J4", "K2", 2)
}

#[test]
fn four_projects_two_resources_schedule_everything() {
    let params = four_project_params();
    let report = level(&params, &CoinCbcSolver::new(), None).unwrap();

    assert_eq!(report.status, "Optimal");
    assert!(report.objective_value.is_some());
    assert_eq!(report.schedule.len(), 10);

    assert!(report.peak_resource_usage["K1"] <= 12.0 + 1e-6);
    assert!(report.peak_resource_usage["K2"] <= 15.0 + 1e-6);

    for entry in &report.schedule {
        assert_eq!(entry.finish, entry.start + entry.duration - 1);
        let key = levelopt::ActivityKey::new(entry.activity.as_str(), entry.project.as_str());
        assert!(entry.duration >= params.min_durations[&key]);
        assert!(entry.duration <= params.max_durations[&key]);
        assert!(entry.start >= params.earliest_start_times[&entry.project]);
        assert!(entry.finish <= params.project_deadlines[&entry.project]);
    }

    // Precedence holds within every project.
    for (project, pairs) in &params.precedences {
        for (predecessor, successor) in pairs {
            let find = |activity: &str| {
                report
                    .schedule
                    .iter()
                    .find(|e| e.project == *project && e.activity == activity)
                    .unwrap()
            };
            assert!(find(successor).start >= find(predecessor).finish + 1);
        }
    }

    // Reported lateness matches the schedule, and sub-tolerance
    // entries are absent.
    for entry in &report.schedule {
        let key = levelopt::ActivityKey::new(entry.activity.as_str(), entry.project.as_str());
        let target = params.target_finish_times[&key];
        let expected = entry.finish.saturating_sub(target);
        let reported = report
            .lateness
            .iter()
            .find(|l| l.project == entry.project && l.activity == entry.activity)
            .map(|l| l.days_late)
            .unwrap_or(0.0);
        assert!(
            (reported - f64::from(expected)).abs() <= 0.01,
            "{key}: reported {reported}, schedule implies {expected}"
        );
    }

    // Sparse reporting: every listed period carries usage, and every
    // period's usage is dominated by the reported peaks.
    for (period, usage) in &report.daily_usage {
        assert!(*period >= 1 && *period <= 10);
        assert!(usage.values().any(|&v| v > 0.0));
        for (resource, &used) in usage {
            assert!(used <= report.peak_resource_usage[resource] + 1e-6);
        }
    }
}

#[test]
fn solved_activity_windows_are_contiguous() {
    let params = four_project_params();
    let model = ModelBuilder::build(&params).unwrap();
    let outcome = CoinCbcSolver::new().solve(&model, None).unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);
    let assignment = outcome.assignment.unwrap();

    let index = &model.index;
    for (a, key) in index.activities().iter().enumerate() {
        let start = assignment[index.start(a).0].round() as u32;
        let finish = assignment[index.finish(a).0].round() as u32;
        for t in 1..=index.horizon() {
            let active = assignment[index.active(a, t).0] > 0.5;
            let inside = t >= start && t <= finish;
            assert_eq!(active, inside, "{key} at period {t}");
        }
    }
}

#[test]
fn resolving_identical_parameters_reproduces_the_objective() {
    let params = four_project_params();
    let first = level(&params, &CoinCbcSolver::new(), None).unwrap();
    let second = level(&params, &CoinCbcSolver::new(), None).unwrap();
    let a = first.objective_value.unwrap();
    let b = second.objective_value.unwrap();
    assert!((a - b).abs() < 1e-6);
}

#[test]
fn single_activity_starts_at_the_earliest_period() {
    let params = ParameterSet::new(6, 0.1)
        .with_project("J1")
        .with_activity("J1", "A1", 3, 3, 3, 25)
        .with_resource("K1", 1.0, 10)
        .with_requirement("A1", "J1", "K1", 2);

    let report = level(&params, &CoinCbcSolver::new(), None).unwrap();

    assert_eq!(report.status, "Optimal");
    assert_eq!(report.schedule.len(), 1);
    assert_eq!(report.schedule[0].start, 1);
    assert_eq!(report.schedule[0].finish, 3);
    assert_eq!(report.schedule[0].duration, 3);
    assert!(report.lateness.is_empty());
}

#[test]
fn requirement_above_capacity_is_infeasible() {
    let params = ParameterSet::new(6, 0.1)
        .with_project("J1")
        .with_activity("J1", "A1", 2, 3, 4, 10)
        .with_resource("K1", 1.0, 12)
        .with_requirement("A1", "J1", "K1", 20);

    let report = level(&params, &CoinCbcSolver::new(), None).unwrap();

    assert_eq!(report.status, "Infeasible");
    assert!(report.objective_value.is_none());
    assert!(report.schedule.is_empty());
    assert!(report.error.is_some());
}
