//! Unit tests for the database service layer, run against the in-memory
//! repository.

use chrono::NaiveDate;

use super::repositories::LocalRepository;
use super::repository::RepositoryError;
use super::services;
use crate::models::{NewReservation, NewUnit, UnitId};
use crate::services::availability::ValidationError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_unit(name: &str, capacity: u32) -> NewUnit {
    NewUnit {
        name: name.to_string(),
        capacity,
    }
}

fn new_reservation(
    unit_id: UnitId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guest_name: &str,
    party_size: u32,
) -> NewReservation {
    NewReservation {
        unit_id,
        check_in,
        check_out,
        guest_name: guest_name.to_string(),
        party_size,
    }
}

#[tokio::test]
async fn test_health_check_reports_repository_state() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());

    repo.set_healthy(false);
    assert!(!services::health_check(&repo).await.unwrap());
}

#[tokio::test]
async fn test_unit_crud_roundtrip() {
    let repo = LocalRepository::new();

    let unit = services::create_unit(&repo, &new_unit("Cabin A", 2)).await.unwrap();
    assert_eq!(unit.name, "Cabin A");
    assert_eq!(unit.capacity, 2);

    let fetched = services::get_unit(&repo, unit.id).await.unwrap();
    assert_eq!(fetched, unit);

    let units = services::list_units(&repo).await.unwrap();
    assert_eq!(units.len(), 1);

    services::delete_unit(&repo, unit.id).await.unwrap();
    assert!(matches!(
        services::get_unit(&repo, unit.id).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_get_unknown_unit_is_not_found() {
    let repo = LocalRepository::new();
    let result = services::get_unit(&repo, UnitId::new(42)).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_create_reservation_persists() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();

    let reservation = services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 1), date(2024, 6, 5), "Alice", 2),
    )
    .await
    .unwrap();

    let listed = services::reservations_for_unit(&repo, unit.id).await.unwrap();
    assert_eq!(listed, vec![reservation]);
}

#[tokio::test]
async fn test_overlapping_create_is_rejected_and_not_written() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();

    services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 1), date(2024, 6, 5), "Alice", 2),
    )
    .await
    .unwrap();

    let result = services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 4), date(2024, 6, 8), "Bob", 1),
    )
    .await;

    match result {
        Err(RepositoryError::Validation { source, .. }) => match source {
            ValidationError::OverlapConflict { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].check_in, date(2024, 6, 1));
                assert_eq!(conflicts[0].check_out, date(2024, 6, 5));
            }
            other => panic!("expected OverlapConflict, got {:?}", other),
        },
        other => panic!("expected Validation error, got {:?}", other),
    }

    // Nothing was written for the rejected request.
    let listed = services::reservations_for_unit(&repo, unit.id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_check_availability_excluding_reservation() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();
    let reservation = services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 1), date(2024, 6, 5), "Alice", 2),
    )
    .await
    .unwrap();

    assert!(
        !services::check_availability(&repo, unit.id, date(2024, 6, 2), date(2024, 6, 6), None)
            .await
            .unwrap()
    );
    assert!(services::check_availability(
        &repo,
        unit.id,
        date(2024, 6, 2),
        date(2024, 6, 6),
        Some(reservation.id)
    )
    .await
    .unwrap());
}

#[tokio::test]
async fn test_check_availability_inverted_range_is_unavailable() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();

    assert!(
        !services::check_availability(&repo, unit.id, date(2024, 6, 5), date(2024, 6, 1), None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_check_availability_unknown_unit_is_not_found() {
    let repo = LocalRepository::new();
    let result =
        services::check_availability(&repo, UnitId::new(99), date(2024, 6, 1), date(2024, 6, 5), None)
            .await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_conflicting_periods_are_ordered() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();

    // Insert out of date order; the query must come back ascending.
    services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 20), date(2024, 6, 25), "Cara", 1),
    )
    .await
    .unwrap();
    services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 1), date(2024, 6, 5), "Alice", 1),
    )
    .await
    .unwrap();

    let periods =
        services::conflicting_periods(&repo, unit.id, date(2024, 5, 1), date(2024, 7, 1), None)
            .await
            .unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].check_in, date(2024, 6, 1));
    assert_eq!(periods[1].check_in, date(2024, 6, 20));
}

#[tokio::test]
async fn test_delete_unit_cascades_to_reservations() {
    let repo = LocalRepository::new();
    let unit = services::create_unit(&repo, &new_unit("Cabin A", 4)).await.unwrap();
    let other = services::create_unit(&repo, &new_unit("Cabin B", 4)).await.unwrap();

    let doomed = services::create_reservation(
        &repo,
        &new_reservation(unit.id, date(2024, 6, 1), date(2024, 6, 5), "Alice", 2),
    )
    .await
    .unwrap();
    let kept = services::create_reservation(
        &repo,
        &new_reservation(other.id, date(2024, 6, 1), date(2024, 6, 5), "Bob", 2),
    )
    .await
    .unwrap();

    services::delete_unit(&repo, unit.id).await.unwrap();

    assert!(matches!(
        services::get_reservation(&repo, doomed.id).await,
        Err(RepositoryError::NotFound { .. })
    ));
    // The other unit's reservation is untouched.
    assert_eq!(
        services::get_reservation(&repo, kept.id).await.unwrap().id,
        kept.id
    );
}
