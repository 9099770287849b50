use chrono::{NaiveDate, NaiveDateTime};
use cpm_tool::{
    Activity, CpmConfig, CpmError, Dependency, Project, ProjectInfo, CriticalPathCalculator,
    calculate_many,
};

fn monday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn act(code: &str, hours: f64) -> Activity {
    Activity::new(code, format!("Activity {code}"))
        .with_planned_start(monday())
        .with_duration_hours(hours)
}

fn codes(path: &cpm_tool::CriticalPath) -> Vec<&str> {
    path.task_codes()
}

#[test]
fn straight_chain_is_one_critical_path() {
    let activities = vec![act("A", 8.0), act("B", 8.0), act("C", 8.0)];
    let deps = vec![Dependency::new("A", "B"), Dependency::new("B", "C")];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();

    assert_eq!(outcome.project_duration_hours, 24.0);
    assert_eq!(outcome.critical_paths.len(), 1);
    let path = &outcome.critical_paths[0];
    assert!(path.is_primary);
    assert_eq!(codes(path), vec!["A", "B", "C"]);
    assert_eq!(path.duration_hours, 24.0);
    assert_eq!(
        path.activities.iter().map(|s| s.sequence).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    for code in ["A", "B", "C"] {
        assert_eq!(outcome.schedule.timing(code).unwrap().total_float, 0.0);
    }
    assert!(!outcome.degraded);
}

#[test]
fn bypass_edge_carries_slack_of_longer_branch() {
    let activities = vec![act("A", 8.0), act("B", 16.0), act("C", 8.0)];
    let deps = vec![
        Dependency::new("A", "C"),
        Dependency::new("A", "B"),
        Dependency::new("B", "C"),
    ];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();

    assert_eq!(outcome.critical_paths.len(), 1);
    assert_eq!(codes(&outcome.critical_paths[0]), vec!["A", "B", "C"]);
    assert_eq!(outcome.project_duration_hours, 32.0);
    assert_eq!(
        outcome
            .schedule
            .relationship_free_float(&Dependency::new("A", "C")),
        Some(16.0)
    );
    assert_eq!(
        outcome
            .schedule
            .relationship_free_float(&Dependency::new("A", "B")),
        Some(0.0)
    );
}

#[test]
fn two_activity_cycle_fails_with_cycle_error() {
    let activities = vec![act("A", 8.0), act("B", 8.0)];
    let deps = vec![Dependency::new("A", "B"), Dependency::new("B", "A")];
    let calculator = CriticalPathCalculator::new(&activities, &deps);

    assert!(calculator.has_cycles().unwrap());
    let cycles = calculator.detect_cycles().unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].length, 2);
    let mut members = cycles[0].task_codes.clone();
    members.sort();
    assert_eq!(members, vec!["A", "B"]);

    match calculator.calculate() {
        Err(CpmError::Cycle { cycles }) => assert_eq!(cycles.len(), 1),
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn equal_chains_into_shared_sink_yield_two_paths() {
    let activities = vec![
        act("Y1", 4.0),
        act("Y2", 12.0),
        act("X1", 8.0),
        act("X2", 8.0),
        act("S", 4.0),
    ];
    let deps = vec![
        Dependency::new("X1", "X2"),
        Dependency::new("X2", "S"),
        Dependency::new("Y1", "Y2"),
        Dependency::new("Y2", "S"),
    ];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();

    assert_eq!(outcome.critical_paths.len(), 2);
    let first = &outcome.critical_paths[0];
    let second = &outcome.critical_paths[1];
    assert_eq!(first.duration_hours, second.duration_hours);
    assert_eq!(first.duration_hours, 20.0);
    assert!(first.is_primary);
    assert!(!second.is_primary);
    assert_eq!(codes(first), vec!["X1", "X2", "S"]);
    assert_eq!(codes(second), vec!["Y1", "Y2", "S"]);
    assert_eq!(outcome.primary_path().map(|p| p.path_id), Some(1));
}

#[test]
fn timings_respect_cpm_identities() {
    let activities = vec![
        act("A", 8.0),
        act("B", 24.0),
        act("C", 4.0),
        act("D", 0.0),
        act("E", 6.0),
    ];
    let deps = vec![
        Dependency::new("A", "B"),
        Dependency::new("A", "C"),
        Dependency::new("C", "E"),
        Dependency::new("B", "D"),
        Dependency::new("E", "D"),
    ];
    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();
    let tolerance = outcome.schedule.float_tolerance_hours;

    for (code, t) in outcome.schedule.iter() {
        assert!(t.early_start <= t.early_finish, "{code}");
        assert!(t.late_start <= t.late_finish, "{code}");
        assert!((t.total_float - (t.late_start - t.early_start)).abs() < 1e-9);
        assert_eq!(outcome.schedule.is_critical(code), t.total_float <= tolerance);
    }

    let primary = outcome.primary_path().unwrap();
    assert_eq!(codes(primary), vec!["A", "B", "D"]);
    assert!((primary.duration_hours - outcome.project_duration_hours).abs() <= tolerance);
    assert_eq!(outcome.schedule.timing("C").unwrap().total_float, 14.0);
    assert_eq!(outcome.schedule.timing("E").unwrap().total_float, 14.0);
}

#[test]
fn zero_duration_milestone_sits_on_path() {
    let activities = vec![act("START", 0.0), act("WORK", 16.0), act("DONE", 0.0)];
    let deps = vec![Dependency::new("START", "WORK"), Dependency::new("WORK", "DONE")];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();
    assert_eq!(codes(&outcome.critical_paths[0]), vec!["START", "WORK", "DONE"]);
    let done = outcome.schedule.timing("DONE").unwrap();
    assert_eq!(done.early_start, done.early_finish);
}

#[test]
fn standalone_activity_driving_the_finish_is_its_own_path() {
    let activities = vec![act("LONG", 40.0), act("A", 8.0), act("B", 8.0)];
    let deps = vec![Dependency::new("A", "B")];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();
    assert_eq!(outcome.critical_paths.len(), 1);
    assert_eq!(codes(&outcome.critical_paths[0]), vec!["LONG"]);
    assert_eq!(outcome.schedule.timing("A").unwrap().total_float, 24.0);
}

#[test]
fn tolerance_controls_near_critical_activities() {
    let activities = vec![act("A", 8.0), act("B", 7.995), act("C", 1.0)];
    let deps = vec![Dependency::new("A", "C"), Dependency::new("B", "C")];

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();
    assert!(outcome.schedule.is_critical("B"));

    let strict = CpmConfig {
        float_tolerance_hours: 0.001,
        ..CpmConfig::default()
    };
    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .with_config(strict)
        .calculate()
        .unwrap();
    assert!(!outcome.schedule.is_critical("B"));
}

#[test]
fn repeated_calculation_is_identical_and_leaves_input_untouched() {
    let activities = vec![act("A", 8.0), act("B", 16.0), act("C", 8.0)];
    let deps = vec![Dependency::new("A", "B"), Dependency::new("B", "C")];
    let snapshot = activities.clone();

    let calculator = CriticalPathCalculator::new(&activities, &deps);
    let first = calculator.calculate().unwrap();
    let second = calculator.calculate().unwrap();
    assert_eq!(first, second);
    assert_eq!(activities, snapshot);
}

#[test]
fn calendar_dates_follow_the_earliest_planned_start() {
    let activities = vec![act("A", 8.0), act("B", 4.0)];
    let deps = vec![Dependency::new("A", "B")];
    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();

    assert_eq!(outcome.schedule.project_start, Some(monday()));
    assert_eq!(
        outcome.schedule.early_start_at("B"),
        Some(monday() + chrono::Duration::hours(8))
    );
    assert_eq!(outcome.project_finish(), Some(monday() + chrono::Duration::hours(12)));
}

#[test]
fn undated_project_needs_configured_start() {
    let activities = vec![Activity::new("A", "Alpha").with_duration_hours(8.0)];
    let err = CriticalPathCalculator::new(&activities, &[])
        .calculate()
        .unwrap_err();
    assert_eq!(err, CpmError::UndatedSchedule);

    let outcome = CriticalPathCalculator::new(&activities, &[])
        .with_config(CpmConfig::default().with_project_start(monday()))
        .calculate()
        .unwrap();
    assert_eq!(outcome.schedule.project_start, Some(monday()));
    assert_eq!(outcome.project_duration_hours, 8.0);
}

#[test]
fn empty_input_yields_empty_outcome() {
    let outcome = CriticalPathCalculator::new(&[], &[]).calculate().unwrap();
    assert!(outcome.critical_paths.is_empty());
    assert_eq!(outcome.project_duration_hours, 0.0);
    assert!(outcome.schedule.is_empty());
}

#[test]
fn max_critical_paths_caps_enumeration() {
    let activities = vec![
        act("A", 4.0),
        act("B", 4.0),
        act("C", 4.0),
        act("D", 4.0),
    ];
    let deps = vec![
        Dependency::new("A", "B"),
        Dependency::new("A", "C"),
        Dependency::new("B", "D"),
        Dependency::new("C", "D"),
    ];
    let config = CpmConfig {
        max_critical_paths: Some(1),
        ..CpmConfig::default()
    };

    let outcome = CriticalPathCalculator::new(&activities, &deps)
        .with_config(config)
        .calculate()
        .unwrap();
    assert_eq!(outcome.critical_paths.len(), 1);
    assert!(outcome.truncated);

    let uncapped = CriticalPathCalculator::new(&activities, &deps)
        .calculate()
        .unwrap();
    assert_eq!(uncapped.critical_paths.len(), 2);
    assert!(!uncapped.truncated);
}

#[test]
fn capped_enumeration_still_reports_the_longest_chain() {
    let activities = vec![act("A", 8.0), act("B", 16.0), act("C", 8.0)];
    let deps = vec![
        Dependency::new("A", "B"),
        Dependency::new("B", "C"),
        Dependency::new("A", "C"),
    ];
    let capped = |max| {
        let config = CpmConfig {
            max_critical_paths: Some(max),
            ..CpmConfig::default()
        };
        CriticalPathCalculator::new(&activities, &deps)
            .with_config(config)
            .calculate()
            .unwrap()
    };

    let one = capped(1);
    assert_eq!(one.project_duration_hours, 32.0);
    assert_eq!(one.critical_paths.len(), 1);
    assert_eq!(codes(&one.critical_paths[0]), vec!["A", "B", "C"]);
    assert_eq!(one.critical_paths[0].duration_hours, 32.0);
    assert!(!one.truncated);

    let none = capped(0);
    assert!(none.critical_paths.is_empty());
    assert!(none.truncated);
    assert!(!none.degraded);
}

#[test]
fn calculate_many_runs_projects_independently() {
    let info = |code: &str| ProjectInfo {
        project_code: code.into(),
        project_name: format!("Project {code}"),
    };
    let projects = vec![
        Project::new(
            info("P1"),
            vec![act("A", 8.0), act("B", 8.0)],
            vec![Dependency::new("A", "B")],
        ),
        Project::new(
            info("P2"),
            vec![act("A", 8.0), act("B", 8.0)],
            vec![Dependency::new("A", "B"), Dependency::new("B", "A")],
        ),
        Project::new(info("P3"), vec![act("Z", 3.0)], Vec::new()),
    ];

    let results = calculate_many(&projects, &CpmConfig::default());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().project_duration_hours, 16.0);
    assert!(matches!(results[1], Err(CpmError::Cycle { .. })));
    assert_eq!(results[2].as_ref().unwrap().project_duration_hours, 3.0);
}
