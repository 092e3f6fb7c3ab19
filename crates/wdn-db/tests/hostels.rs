//! Hostel lifecycle: transactional creation with rooms, cascade deletion,
//! and the effect of deletion on allocations.

mod common;

use pretty_assertions::assert_eq;

use wdn_core::enums::{AllocationPhase, GenderPolicy};
use wdn_core::run::RunHandle;
use wdn_db::error::DatabaseError;
use wdn_db::repos::hostel::NewRoom;

use common::{insert_profile, insert_student, insert_submission, service};

fn rooms(specs: &[(&str, i64)]) -> Vec<NewRoom> {
    specs
        .iter()
        .map(|(number, capacity)| NewRoom {
            room_number: (*number).to_string(),
            capacity: *capacity,
        })
        .collect()
}

#[tokio::test]
async fn create_hostel_rejects_empty_room_list() {
    let svc = service().await;
    let err = svc
        .create_hostel("North Hall", "Campus North", "Mrs. Ade", GenderPolicy::Mixed, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidState(_)));
    assert!(svc.list_hostels().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_hostel_persists_hostel_and_rooms() {
    let svc = service().await;
    let (hostel, created) = svc
        .create_hostel(
            "North Hall",
            "Campus North",
            "Mrs. Ade",
            GenderPolicy::Female,
            &rooms(&[("A1", 4), ("A2", 2)]),
        )
        .await
        .unwrap();

    assert_eq!(hostel.gender, GenderPolicy::Female);
    assert_eq!(created.len(), 2);
    for room in &created {
        assert_eq!(room.hostel_id, hostel.id);
        assert_eq!(room.occupied, 0);
    }

    let listed = svc.list_rooms(&hostel.id).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn delete_hostel_cascades_rooms_and_allocations() {
    let svc = service().await;
    let (hostel, _) = svc
        .create_hostel(
            "North Hall",
            "Campus North",
            "Mrs. Ade",
            GenderPolicy::Mixed,
            &rooms(&[("A1", 4)]),
        )
        .await
        .unwrap();

    insert_student(&svc, "stu-01", "male").await;
    insert_submission(&svc, "stu-01", "2026-08-01T10:00:00+00:00").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;
    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(result.processed, 1);

    svc.delete_hostel(&hostel.id).await.unwrap();

    assert!(matches!(
        svc.get_hostel(&hostel.id).await.unwrap_err(),
        DatabaseError::NoResult
    ));
    assert!(svc.list_rooms(&hostel.id).await.unwrap().is_empty());
    assert_eq!(svc.load_allocation("stu-01").await.unwrap(), None);

    // The student drops back to Processing and rejoins the cohort.
    let report = svc.resolve_status("stu-01").await.unwrap();
    assert_eq!(report.phase, AllocationPhase::Processing);
    let cohort = svc.load_unallocated_cohort().await.unwrap();
    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort[0].student_id, "stu-01");
}
