// src/tests/conflict_tests.rs
use super::{date, delegation_data, seed_user, test_state};

#[test]
fn overlapping_windows_to_the_same_recipient_are_flagged() {
    let state = test_state();
    let a = seed_user(&state, "doctor");
    let b = seed_user(&state, "receptionist");
    let to = seed_user(&state, "nurse");

    let first = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap();
    assert!(first.conflict.is_none());

    // [D1,D10] vs [D5,D15] overlaps, but creation still succeeds.
    let second = state
        .delegations
        .create(
            delegation_data(
                &b.id,
                &to.id,
                &["appointments.create"],
                date(2025, 10, 5),
                date(2025, 10, 15),
            ),
            &b.id,
        )
        .unwrap();
    let warning = second.conflict.expect("overlap should be flagged");
    assert_eq!(warning.delegation_id, first.delegation.id);
    assert_eq!(warning.from_user_id, a.id);
    assert!(second.delegation.is_active);
}

#[test]
fn disjoint_windows_do_not_conflict() {
    let state = test_state();
    let a = seed_user(&state, "doctor");
    let to = seed_user(&state, "nurse");

    state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 5),
            ),
            &a.id,
        )
        .unwrap();

    // [D1,D5] vs [D6,D10]: no shared day.
    let outcome = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["records.read"],
                date(2025, 10, 6),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap();
    assert!(outcome.conflict.is_none());
}

#[test]
fn boundary_days_count_as_overlap() {
    let state = test_state();
    let a = seed_user(&state, "doctor");
    let to = seed_user(&state, "nurse");

    state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 5),
            ),
            &a.id,
        )
        .unwrap();

    // One ends on D5, the other starts on D5: both hold that whole day.
    let outcome = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["records.read"],
                date(2025, 10, 5),
                date(2025, 10, 9),
            ),
            &a.id,
        )
        .unwrap();
    assert!(outcome.conflict.is_some());
}

#[test]
fn revoked_grants_and_other_recipients_are_ignored() {
    let state = test_state();
    let a = seed_user(&state, "doctor");
    let to = seed_user(&state, "nurse");
    let other = seed_user(&state, "receptionist");

    let first = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap()
        .delegation;
    state.delegations.revoke(&first.id, &a.id, None).unwrap();

    // Same window, but the only existing grant is revoked.
    let outcome = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["records.read"],
                date(2025, 10, 1),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap();
    assert!(outcome.conflict.is_none());

    // A grant to a different recipient never conflicts.
    let outcome = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &other.id,
                &["records.read"],
                date(2025, 10, 1),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap();
    assert!(outcome.conflict.is_none());
}

#[test]
fn detector_can_exclude_a_record_by_id() {
    let state = test_state();
    let a = seed_user(&state, "doctor");
    let to = seed_user(&state, "nurse");

    let existing = state
        .delegations
        .create(
            delegation_data(
                &a.id,
                &to.id,
                &["appointments.read"],
                date(2025, 10, 1),
                date(2025, 10, 10),
            ),
            &a.id,
        )
        .unwrap()
        .delegation;

    let detector = state.delegations.detector();
    let hit = detector
        .find_conflict(&to.id, date(2025, 10, 5), date(2025, 10, 20), None)
        .unwrap();
    assert!(hit.is_some());

    let excluded = detector
        .find_conflict(
            &to.id,
            date(2025, 10, 5),
            date(2025, 10, 20),
            Some(existing.id.as_str()),
        )
        .unwrap();
    assert!(excluded.is_none());
}
