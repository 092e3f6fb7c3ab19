//! End-to-end behavior of the allocation engine: greedy best-room choice,
//! constraint filtering, counters, cancellation, and re-run idempotence.

mod common;

use pretty_assertions::assert_eq;

use wdn_core::enums::RunState;
use wdn_core::run::RunHandle;

use common::{
    allocated_room, insert_hostel, insert_occupant, insert_profile, insert_room, insert_student,
    room_occupied, service,
};

#[tokio::test]
async fn empty_eligible_room_gets_score_zero() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "female").await;
    insert_profile(&svc, "stu-01", [7, 1, 7, 2]).await;

    let handle = RunHandle::new();
    let result = svc.run_allocation(&handle).await.unwrap();

    assert_eq!(result.processed, 1);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.failed, 0);
    assert_eq!(
        allocated_room(&svc, "stu-01").await,
        Some(("rom-a1".to_string(), 0))
    );
    assert_eq!(room_occupied(&svc, "rom-a1").await, 1);
    assert_eq!(handle.state(), RunState::Completed);
}

#[tokio::test]
async fn picks_room_with_smallest_mean_distance() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_room(&svc, "rom-a2", "hst-a", 4, 0).await;

    // rom-a1 occupant at distance 2 from the incoming student,
    // rom-a2 occupant at distance 10.
    insert_occupant(&svc, "stu-occ1", "male", [4, 4, 4, 2], "rom-a1").await;
    insert_occupant(&svc, "stu-occ2", "male", [7, 7, 7, 1], "rom-a2").await;
    svc.db()
        .conn()
        .execute("UPDATE rooms SET occupied = 1", ())
        .await
        .unwrap();

    insert_student(&svc, "stu-new", "male").await;
    insert_profile(&svc, "stu-new", [4, 4, 4, 4]).await;

    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();

    assert_eq!(result.processed, 1);
    assert_eq!(
        allocated_room(&svc, "stu-new").await,
        Some(("rom-a1".to_string(), 2))
    );
    assert_eq!(room_occupied(&svc, "rom-a1").await, 2);
    assert_eq!(room_occupied(&svc, "rom-a2").await, 1);
}

#[tokio::test]
async fn mean_distance_is_rounded_to_nearest() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;

    // Distances 2 and 3 from the incoming student: mean 2.5, stored as 3.
    insert_occupant(&svc, "stu-occ1", "male", [4, 4, 4, 2], "rom-a1").await;
    insert_occupant(&svc, "stu-occ2", "male", [4, 4, 4, 1], "rom-a1").await;
    svc.db()
        .conn()
        .execute("UPDATE rooms SET occupied = 2", ())
        .await
        .unwrap();

    insert_student(&svc, "stu-new", "male").await;
    insert_profile(&svc, "stu-new", [4, 4, 4, 4]).await;

    svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(
        allocated_room(&svc, "stu-new").await,
        Some(("rom-a1".to_string(), 3))
    );
}

#[tokio::test]
async fn gender_policy_skips_student_without_failing() {
    let svc = service().await;
    insert_hostel(&svc, "hst-m", "male").await;
    insert_room(&svc, "rom-m1", "hst-m", 4, 0).await;
    insert_student(&svc, "stu-f", "female").await;
    insert_profile(&svc, "stu-f", [4, 4, 4, 4]).await;

    let handle = RunHandle::new();
    let result = svc.run_allocation(&handle).await.unwrap();

    assert_eq!(result.processed, 0);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(allocated_room(&svc, "stu-f").await, None);
    // A skip still completes the run.
    assert_eq!(handle.state(), RunState::Completed);
}

#[tokio::test]
async fn mixed_hostel_admits_both_genders() {
    let svc = service().await;
    insert_hostel(&svc, "hst-x", "mixed").await;
    insert_room(&svc, "rom-x1", "hst-x", 4, 0).await;
    insert_student(&svc, "stu-01", "female").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;
    insert_student(&svc, "stu-02", "male").await;
    insert_profile(&svc, "stu-02", [4, 4, 4, 4]).await;

    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(result.processed, 2);
    assert_eq!(room_occupied(&svc, "rom-x1").await, 2);
}

#[tokio::test]
async fn full_rooms_are_never_candidates() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-full", "hst-a", 1, 1).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();

    assert_eq!(result.skipped, 1);
    assert_eq!(room_occupied(&svc, "rom-full").await, 1);
}

#[tokio::test]
async fn occupancy_never_exceeds_capacity() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 2, 0).await;
    for i in 1..=3 {
        let id = format!("stu-0{i}");
        insert_student(&svc, &id, "male").await;
        insert_profile(&svc, &id, [4, 4, 4, 4]).await;
    }

    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();

    assert_eq!(result.processed, 2);
    assert_eq!(result.skipped, 1);
    assert_eq!(room_occupied(&svc, "rom-a1").await, 2);
}

#[tokio::test]
async fn ties_keep_the_first_candidate_room() {
    let svc = service().await;
    // Both rooms empty, so both score 0; candidate order is hostel ID then
    // room ID ascending, so rom-a1 wins.
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_hostel(&svc, "hst-b", "mixed").await;
    insert_room(&svc, "rom-b1", "hst-b", 4, 0).await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(
        allocated_room(&svc, "stu-01").await,
        Some(("rom-a1".to_string(), 0))
    );
}

#[tokio::test]
async fn cohort_is_traversed_by_ascending_student_id() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 1, 0).await;
    // Insert out of ID order; only one bed exists, so it must go to stu-01.
    insert_student(&svc, "stu-02", "male").await;
    insert_profile(&svc, "stu-02", [4, 4, 4, 4]).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert!(allocated_room(&svc, "stu-01").await.is_some());
    assert_eq!(allocated_room(&svc, "stu-02").await, None);
}

#[tokio::test]
async fn students_without_traits_are_not_in_the_cohort() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-no-traits", "male").await;

    let result = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(result.processed + result.skipped + result.failed, 0);
}

#[tokio::test]
async fn second_run_over_settled_cohort_is_a_noop() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    let first = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(first.processed, 1);

    let second = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 0);
    assert_eq!(room_occupied(&svc, "rom-a1").await, 1);
}

#[tokio::test]
async fn full_room_write_leaves_no_orphaned_allocation() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 1, 1).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    // The seat claim fails, so the allocation INSERT in the same
    // transaction must roll back with it.
    let err = svc
        .persist_allocation("stu-01", "rom-a1", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, wdn_db::error::DatabaseError::InvalidState(_)));

    assert_eq!(allocated_room(&svc, "stu-01").await, None);
    assert_eq!(room_occupied(&svc, "rom-a1").await, 1);
    // Still in the cohort for the next run.
    let cohort = svc.load_unallocated_cohort().await.unwrap();
    assert_eq!(cohort.len(), 1);
}

#[tokio::test]
async fn cancellation_stops_scheduling_but_completes_the_run() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    let handle = RunHandle::new();
    handle.cancel();
    let result = svc.run_allocation(&handle).await.unwrap();

    // No students scheduled, but the run still ends Completed, not Aborted.
    assert_eq!(result.processed, 0);
    assert_eq!(allocated_room(&svc, "stu-01").await, None);
    assert_eq!(handle.state(), RunState::Completed);
}

#[tokio::test]
async fn cancellation_keeps_earlier_allocations_durable() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    let first = svc.run_allocation(&RunHandle::new()).await.unwrap();
    assert_eq!(first.processed, 1);
    let placed = allocated_room(&svc, "stu-01").await;
    assert!(placed.is_some());

    // A later cohort arrives but the next run is cancelled mid-flight.
    insert_student(&svc, "stu-02", "male").await;
    insert_profile(&svc, "stu-02", [4, 4, 4, 4]).await;
    let handle = RunHandle::new();
    handle.cancel();
    let second = svc.run_allocation(&handle).await.unwrap();

    // Nothing new scheduled; the earlier allocation is untouched.
    assert_eq!(second.processed, 0);
    assert_eq!(allocated_room(&svc, "stu-02").await, None);
    assert_eq!(allocated_room(&svc, "stu-01").await, placed);
    assert_eq!(room_occupied(&svc, "rom-a1").await, 1);
}

#[tokio::test]
async fn run_writes_audit_entries() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 0).await;
    insert_student(&svc, "stu-01", "male").await;
    insert_profile(&svc, "stu-01", [4, 4, 4, 4]).await;

    svc.run_allocation(&RunHandle::new()).await.unwrap();

    for action in ["run_started", "run_completed", "allocated"] {
        let mut rows = svc
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM audit_trail WHERE action = ?1",
                [action],
            )
            .await
            .unwrap();
        let count = rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap();
        assert_eq!(count, 1, "expected one '{action}' audit entry");
    }
}
