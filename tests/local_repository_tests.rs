//! Integration tests for the in-memory repository.
//!
//! These exercise the repository trait surface directly, including the rule
//! that reservation invariants are enforced on direct data-layer writes, not
//! just through the HTTP API.

use chrono::NaiveDate;

use sejour::db::repositories::LocalRepository;
use sejour::db::repository::{
    RepositoryError, ReservationRepository, UnitRepository,
};
use sejour::models::{NewReservation, NewUnit, ReservationId, UnitId};
use sejour::services::availability::ValidationError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_unit(name: &str, capacity: u32) -> NewUnit {
    NewUnit {
        name: name.to_string(),
        capacity,
    }
}

fn booking(
    unit_id: UnitId,
    guest: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    party_size: u32,
) -> NewReservation {
    NewReservation {
        unit_id,
        check_in,
        check_out,
        guest_name: guest.to_string(),
        party_size,
    }
}

fn expect_validation(err: RepositoryError) -> ValidationError {
    match err {
        RepositoryError::Validation { source, .. } => source,
        other => panic!("expected Validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cabin_a_booking_scenario() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 2)).await.unwrap();

    // Alice books June 1-5 with a full party.
    let r1 = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 2))
        .await
        .unwrap();
    assert_eq!(r1.guest_name, "Alice");

    // Bob's June 4-8 attempt overlaps Alice's stay and is rejected with the
    // conflicting period listed.
    let err = repo
        .create_reservation(&booking(cabin.id, "Bob", date(2024, 6, 4), date(2024, 6, 8), 1))
        .await
        .unwrap_err();
    match expect_validation(err) {
        ValidationError::OverlapConflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].check_in, date(2024, 6, 1));
            assert_eq!(conflicts[0].check_out, date(2024, 6, 5));
        }
        other => panic!("expected OverlapConflict, got {:?}", other),
    }

    // Cara checks in the day Alice checks out: adjacent, accepted.
    let r3 = repo
        .create_reservation(&booking(cabin.id, "Cara", date(2024, 6, 5), date(2024, 6, 8), 2))
        .await
        .unwrap();
    assert_eq!(r3.guest_name, "Cara");

    assert_eq!(repo.reservation_count(), 2);
}

#[tokio::test]
async fn test_edit_in_place_excludes_own_range() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 2)).await.unwrap();

    let r1 = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 2))
        .await
        .unwrap();

    // Shift the stay by one day; overlaps only its own prior range.
    let updated = repo
        .update_reservation(
            r1.id,
            &booking(cabin.id, "Alice", date(2024, 6, 2), date(2024, 6, 6), 2),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, r1.id);
    assert_eq!(updated.check_in, date(2024, 6, 2));
    assert_eq!(updated.check_out, date(2024, 6, 6));
}

#[tokio::test]
async fn test_update_still_conflicts_with_other_reservations() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    repo.create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 2))
        .await
        .unwrap();
    let r2 = repo
        .create_reservation(&booking(cabin.id, "Bob", date(2024, 6, 10), date(2024, 6, 15), 2))
        .await
        .unwrap();

    // Bob tries to move onto Alice's dates.
    let err = repo
        .update_reservation(
            r2.id,
            &booking(cabin.id, "Bob", date(2024, 6, 3), date(2024, 6, 7), 2),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        expect_validation(err),
        ValidationError::OverlapConflict { .. }
    ));

    // The failed update wrote nothing.
    let stored = repo.get_reservation(r2.id).await.unwrap();
    assert_eq!(stored.check_in, date(2024, 6, 10));
}

#[tokio::test]
async fn test_capacity_boundary_on_direct_write() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    // Exactly at capacity is fine.
    repo.create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 4))
        .await
        .unwrap();

    // One over capacity is rejected, even on this direct data-layer write.
    let err = repo
        .create_reservation(&booking(cabin.id, "Bob", date(2024, 7, 1), date(2024, 7, 5), 5))
        .await
        .unwrap_err();
    match expect_validation(err) {
        ValidationError::CapacityExceeded {
            requested,
            capacity,
        } => {
            assert_eq!(requested, 5);
            assert_eq!(capacity, 4);
        }
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_date_order_boundary() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    // Zero-length stay rejected.
    let err = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 1), 1))
        .await
        .unwrap_err();
    assert!(matches!(
        expect_validation(err),
        ValidationError::InvalidDateRange { .. }
    ));

    // One-night stay accepted.
    repo.create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 2), 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reservation_for_unknown_unit_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo
        .create_reservation(&booking(
            UnitId::new(99),
            "Alice",
            date(2024, 6, 1),
            date(2024, 6, 5),
            1,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_update_unknown_reservation_is_not_found() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    let err = repo
        .update_reservation(
            ReservationId::new(404),
            &booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_deleting_reservation_frees_the_range() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    let r1 = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 2))
        .await
        .unwrap();
    repo.delete_reservation(r1.id).await.unwrap();

    repo.create_reservation(&booking(cabin.id, "Bob", date(2024, 6, 2), date(2024, 6, 6), 2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reservations_for_unit_excludes_and_orders() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    let later = repo
        .create_reservation(&booking(cabin.id, "Cara", date(2024, 6, 20), date(2024, 6, 25), 1))
        .await
        .unwrap();
    let earlier = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 1))
        .await
        .unwrap();

    let all = repo.reservations_for_unit(cabin.id, None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, earlier.id);
    assert_eq!(all[1].id, later.id);

    let without_later = repo
        .reservations_for_unit(cabin.id, Some(later.id))
        .await
        .unwrap();
    assert_eq!(without_later.len(), 1);
    assert_eq!(without_later[0].id, earlier.id);
}

#[tokio::test]
async fn test_unhealthy_repository_refuses_writes() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();
    repo.set_healthy(false);

    let err = repo
        .create_reservation(&booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Connection { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_bookings_cannot_both_commit() {
    let repo = LocalRepository::new();
    let cabin = repo.create_unit(&new_unit("Cabin A", 4)).await.unwrap();

    // Fire two overlapping bookings concurrently; the write-lock critical
    // section guarantees exactly one of them lands.
    let a = {
        let repo = repo.clone();
        let req = booking(cabin.id, "Alice", date(2024, 6, 1), date(2024, 6, 5), 1);
        tokio::spawn(async move { repo.create_reservation(&req).await })
    };
    let b = {
        let repo = repo.clone();
        let req = booking(cabin.id, "Bob", date(2024, 6, 3), date(2024, 6, 7), 1);
        tokio::spawn(async move { repo.create_reservation(&req).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert_eq!(repo.reservation_count(), 1);
}
