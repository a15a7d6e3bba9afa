mod common;

use pretty_assertions::assert_eq;
use procset::projection::project;
use procset::{ConfigRecord, GroupStatus};

use common::record;

fn names(records: &[ConfigRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn unordered_records_sort_last_then_by_name() {
    let records = vec![
        record("B", Some("G"), Some(3), true),
        record("A", Some("G"), None, true),
        record("C", Some("G"), Some(1), true),
        record("D", Some("G"), None, true),
    ];

    let groups = project(&records);
    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0].records), vec!["C", "B", "A", "D"]);
}

#[test]
fn mixed_and_active_groups_are_classified() {
    let records = vec![
        record("Second", Some("G1"), Some(2), false),
        record("Only", Some("G2"), Some(1), true),
        record("First", Some("G1"), Some(1), true),
    ];

    let groups = project(&records);
    let summary: Vec<(&str, GroupStatus, String)> = groups
        .iter()
        .map(|g| (g.name.as_str(), g.status, g.ratio_label()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("G1", GroupStatus::Mixed, "1/2 Active".to_string()),
            ("G2", GroupStatus::Active, "1/1 Active".to_string()),
        ]
    );
    assert_eq!(names(&groups[0].records), vec!["First", "Second"]);
    assert!(!groups[0].all_active);
    assert!(groups[1].all_active);
}

#[test]
fn all_inactive_group_reports_zero_active() {
    let records = vec![
        record("A", Some("Idle"), Some(1), false),
        record("B", Some("Idle"), Some(2), false),
        record("C", Some("Idle"), None, false),
    ];

    let groups = project(&records);
    assert_eq!(groups[0].status, GroupStatus::Inactive);
    assert_eq!(groups[0].status.style_class(), "inactive");
    assert_eq!(groups[0].ratio_label(), "0/3 Active");
}

#[test]
fn missing_group_collapses_to_ungrouped() {
    let records = vec![
        record("Loose", None, None, true),
        record("Tagged", Some("Alpha"), None, true),
        record("Also loose", None, Some(1), false),
    ];

    let groups = project(&records);
    let group_names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(group_names, vec!["Alpha", "Ungrouped"]);
    assert_eq!(names(&groups[1].records), vec!["Also loose", "Loose"]);
    assert_eq!(groups[1].status, GroupStatus::Mixed);
}

#[test]
fn every_record_lands_in_exactly_one_group() {
    let mut records = Vec::new();
    for i in 0..40_i64 {
        let group = match i % 4 {
            0 => None,
            1 => Some("Billing"),
            2 => Some("Sync"),
            _ => Some("Archive"),
        };
        let order = (i % 3 != 0).then_some(i % 7);
        records.push(record(&format!("job-{i:02}"), group, order, i % 2 == 0));
    }

    let groups = project(&records);

    let mut seen: Vec<String> = groups
        .iter()
        .flat_map(|g| g.records.iter().map(|r| r.identifier.clone()))
        .collect();
    seen.sort();
    let mut expected: Vec<String> = records.iter().map(|r| r.identifier.clone()).collect();
    expected.sort();
    assert_eq!(seen, expected);

    for g in &groups {
        assert_eq!(g.total, g.records.len());
        assert!(g.records.iter().all(|r| r.group_name() == g.name));
    }

    let group_names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    let mut sorted = group_names.clone();
    sorted.sort();
    assert_eq!(group_names, sorted);
}

#[test]
fn projection_is_deterministic_for_shuffled_input() {
    let a = vec![
        record("x", Some("G"), Some(2), true),
        record("y", Some("H"), None, false),
        record("z", Some("G"), Some(1), false),
    ];
    let mut b = a.clone();
    b.reverse();

    assert_eq!(project(&a), project(&b));
}
