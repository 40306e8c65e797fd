use chrono::NaiveDate;

use lcb_insights::record::{AgeGroup, Record};
use lcb_insights::summary::{Scope, SkipReason, aggregate_team, summarize, summarize_player};
use lcb_insights::targets::TargetConfig;

fn rec(name: &str, team: &str, age: u32, metric: &str, day: u32, average: f64) -> Record {
    Record {
        full_name: name.to_string(),
        team: team.to_string(),
        age: Some(age),
        metric: metric.to_string(),
        date: Some(NaiveDate::from_ymd_opt(2025, 6, day).expect("valid day")),
        attempts: [None, None, None],
        last_attempt: None,
        average: Some(average),
        highest: None,
        lowest: None,
    }
}

#[test]
fn higher_better_summary_from_two_sessions() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Bench", 1, 30.0),
        rec("A", "Hawks", 12, "Bench", 2, 50.0),
    ];
    let row = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    assert_eq!(row.first, 30.0);
    assert_eq!(row.last, 50.0);
    assert_eq!(row.best, 50.0);
    assert_eq!(row.growth, 20.0);
    assert_eq!(row.age_group, AgeGroup::U12);
    assert_eq!(row.goal, Some(50.0));
    assert_eq!(row.goal_met, Some(true));
}

#[test]
fn lower_better_growth_is_sign_normalized() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 9, "10 yard sprint", 1, 2.5),
        rec("A", "Hawks", 9, "10 yard sprint", 2, 2.0),
    ];
    let row = summarize_player(&records, "A", "10 yard sprint", &cfg).expect("row");
    assert_eq!(row.first, 2.5);
    assert_eq!(row.last, 2.0);
    assert_eq!(row.best, 2.0);
    assert_eq!(row.growth, 0.5);
    // 10U sprint target is 2.0; hitting it exactly counts as met.
    assert_eq!(row.goal, Some(2.0));
    assert_eq!(row.goal_met, Some(true));
}

#[test]
fn missing_target_stays_absent() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Broad Jump", 1, 60.0),
        rec("A", "Hawks", 12, "Broad Jump", 2, 65.0),
    ];
    let row = summarize_player(&records, "A", "Broad Jump", &cfg).expect("row");
    assert_eq!(row.goal, None);
    assert_eq!(row.goal_met, None);
    assert_eq!(row.growth, 5.0);
}

#[test]
fn unknown_age_excluded_from_target_comparison() {
    let cfg = TargetConfig::builtin();
    let mut record = rec("A", "Hawks", 12, "Bench", 1, 40.0);
    record.age = None;
    let row = summarize_player(&[record], "A", "Bench", &cfg).expect("row");
    assert_eq!(row.age_group, AgeGroup::Unknown);
    assert_eq!(row.goal, None);
    assert_eq!(row.goal_met, None);
}

#[test]
fn summarize_is_pure() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Bench", 2, 50.0),
        rec("A", "Hawks", 12, "Bench", 1, 30.0),
    ];
    let a = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    let b = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    assert_eq!(a.first, b.first);
    assert_eq!(a.last, b.last);
    assert_eq!(a.best, b.best);
    assert_eq!(a.growth, b.growth);
    assert_eq!(a.goal, b.goal);
}

#[test]
fn equal_dates_keep_input_order() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Bench", 1, 10.0),
        rec("A", "Hawks", 12, "Bench", 1, 20.0),
    ];
    let row = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    assert_eq!(row.first, 10.0);
    assert_eq!(row.last, 20.0);
}

#[test]
fn best_prefers_session_bound_over_average() {
    let cfg = TargetConfig::builtin();
    let mut second = rec("A", "Hawks", 12, "Bench", 2, 50.0);
    second.highest = Some(52.0);
    let records = vec![rec("A", "Hawks", 12, "Bench", 1, 30.0), second];
    let row = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    assert_eq!(row.first, 30.0);
    assert_eq!(row.last, 50.0);
    assert_eq!(row.best, 52.0);
    assert_eq!(row.growth, 22.0);
}

#[test]
fn undated_records_count_toward_best_only() {
    let cfg = TargetConfig::builtin();
    let mut undated = rec("A", "Hawks", 12, "Bench", 1, 55.0);
    undated.date = None;
    let records = vec![rec("A", "Hawks", 12, "Bench", 1, 40.0), undated];
    let row = summarize_player(&records, "A", "Bench", &cfg).expect("row");
    assert_eq!(row.first, 40.0);
    assert_eq!(row.last, 40.0);
    assert_eq!(row.best, 55.0);
}

#[test]
fn skip_reasons_are_reported() {
    let cfg = TargetConfig::builtin();
    let records = vec![rec("A", "Hawks", 12, "Bench", 1, 30.0)];
    assert_eq!(
        summarize_player(&records, "B", "Bench", &cfg).unwrap_err(),
        SkipReason::EmptyGroup
    );
    assert_eq!(
        summarize_player(&records, "A", "Squat", &cfg).unwrap_err(),
        SkipReason::EmptyGroup
    );

    let mut undated = rec("A", "Hawks", 12, "Bench", 1, 30.0);
    undated.date = None;
    assert_eq!(
        summarize_player(&[undated], "A", "Bench", &cfg).unwrap_err(),
        SkipReason::NoDatedRecords
    );

    let mut empty = rec("A", "Hawks", 12, "Bench", 1, 30.0);
    empty.average = None;
    assert_eq!(
        summarize_player(&[empty], "A", "Bench", &cfg).unwrap_err(),
        SkipReason::NoUsableValues
    );
}

#[test]
fn team_aggregate_averages_only_contributing_players() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Bench", 1, 30.0),
        rec("A", "Hawks", 12, "Bench", 2, 50.0),
        rec("B", "Hawks", 12, "Bench", 1, 40.0),
        rec("B", "Hawks", 12, "Bench", 2, 60.0),
        // C never benched; must not drag the means toward zero.
        rec("C", "Hawks", 9, "10 yard sprint", 1, 2.4),
        rec("D", "Falcons", 12, "Bench", 1, 80.0),
    ];
    let row = aggregate_team(&records, "Hawks", "Bench", &cfg).expect("row");
    assert_eq!(row.players_counted, 2);
    assert_eq!(row.first, 35.0);
    assert_eq!(row.last, 55.0);
    assert_eq!(row.best, 55.0);
    assert_eq!(row.growth, 20.0);
    // Mean age spans all Hawks records: (12*4 + 9) / 5.
    assert_eq!(row.mean_age, Some(11.4));
    // 12U bench target is 50.
    assert_eq!(row.goal, Some(50.0));
    assert_eq!(row.goal_met, Some(true));
}

#[test]
fn team_with_no_usable_rows_is_omitted() {
    let cfg = TargetConfig::builtin();
    let records = vec![rec("A", "Hawks", 12, "Bench", 1, 30.0)];
    assert!(aggregate_team(&records, "Hawks", "Squat", &cfg).is_none());
    assert!(aggregate_team(&records, "Falcons", "Bench", &cfg).is_none());
}

#[test]
fn team_scope_reshapes_to_summary_row() {
    let cfg = TargetConfig::builtin();
    let records = vec![
        rec("A", "Hawks", 12, "Bench", 1, 30.0),
        rec("A", "Hawks", 12, "Bench", 2, 50.0),
    ];
    let row = summarize(&records, Scope::Team("Hawks"), "Bench", &cfg).expect("row");
    assert_eq!(row.scope, "Hawks");
    assert_eq!(row.age_group, AgeGroup::U12);
    assert_eq!(row.sessions, 2);
    assert_eq!(row.best, 50.0);
}
