// src/tests/export_tests.rs
use super::{date, delegation_data, seed_user, team_data, test_state};
use crate::services::export;

#[test]
fn teams_csv_has_a_header_and_one_row_per_team() {
    let state = test_state();
    let leader = seed_user(&state, "doctor");

    let mut data = team_data("Ward A", &leader.id);
    data.department = Some("medicine".to_string());
    state.directory.create_team(data, &leader.id).unwrap();

    let teams = state.directory.list_teams().unwrap();
    let csv = export::teams_to_csv(&teams);
    let lines: Vec<&str> = csv.trim_end().lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,name,department,leader_id"));
    assert!(lines[1].contains("Ward A"));
    assert!(lines[1].contains("medicine"));
}

#[test]
fn csv_fields_with_commas_or_quotes_are_escaped() {
    let state = test_state();
    let leader = seed_user(&state, "doctor");

    let mut data = team_data("Cardiology, \"A\" wing", &leader.id);
    data.department = Some("medicine".to_string());
    state.directory.create_team(data, &leader.id).unwrap();

    let teams = state.directory.list_teams().unwrap();
    let csv = export::teams_to_csv(&teams);

    assert!(csv.contains("\"Cardiology, \"\"A\"\" wing\""));
}

#[test]
fn delegations_csv_carries_the_derived_status() {
    let state = test_state();
    let from = seed_user(&state, "doctor");
    let to = seed_user(&state, "nurse");
    let approver = seed_user(&state, "administrator");

    let created = state
        .delegations
        .create(
            delegation_data(
                &from.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 15),
            ),
            &from.id,
        )
        .unwrap()
        .delegation;

    let all = state.delegations.list_all().unwrap();
    let csv = export::delegations_to_csv(&all, date(2025, 10, 5));
    assert!(csv.contains("pending_approval"));

    state.delegations.approve(&created.id, &approver.id).unwrap();
    let all = state.delegations.list_all().unwrap();

    let csv = export::delegations_to_csv(&all, date(2025, 10, 5));
    assert!(csv.contains(",active,"));

    let csv = export::delegations_to_csv(&all, date(2025, 12, 1));
    assert!(csv.contains(",expired,"));
}
