//! Compatibility distribution and dashboard counts.

mod common;

use pretty_assertions::assert_eq;

use common::{insert_hostel, insert_occupant, insert_room, insert_student, insert_submission, service};

async fn set_score(svc: &wdn_db::service::WdnService, student_id: &str, score: i64) {
    svc.db()
        .conn()
        .execute(
            "UPDATE allocations SET compatibility_score = ?1 WHERE student_id = ?2",
            libsql::params![score, student_id],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn no_allocations_yields_default_stats() {
    let svc = service().await;
    let stats = svc.compatibility_stats().await.unwrap();
    assert_eq!(stats.total_allocations, 0);
    assert_eq!(stats.average_percent, 0);
}

#[tokio::test]
async fn scores_land_in_percentage_bands() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 8, 4).await;

    // Raw distances 0, 3, 6, 12 → 100%, 88%, 75%, 50%.
    insert_occupant(&svc, "stu-01", "male", [4, 4, 4, 4], "rom-a1").await;
    insert_occupant(&svc, "stu-02", "male", [4, 4, 4, 4], "rom-a1").await;
    insert_occupant(&svc, "stu-03", "male", [4, 4, 4, 4], "rom-a1").await;
    insert_occupant(&svc, "stu-04", "male", [4, 4, 4, 4], "rom-a1").await;
    set_score(&svc, "stu-01", 0).await;
    set_score(&svc, "stu-02", 3).await;
    set_score(&svc, "stu-03", 6).await;
    set_score(&svc, "stu-04", 12).await;

    let stats = svc.compatibility_stats().await.unwrap();
    assert_eq!(stats.total_allocations, 4);
    assert_eq!(stats.band_90_100, 1);
    assert_eq!(stats.band_80_89, 1);
    assert_eq!(stats.band_70_79, 1);
    assert_eq!(stats.band_60_69, 0);
    assert_eq!(stats.below_60, 1);
    // round((100 + 88 + 75 + 50) / 4) = round(78.25) = 78
    assert_eq!(stats.average_percent, 78);
}

#[tokio::test]
async fn dashboard_counts_reflect_pipeline_stages() {
    let svc = service().await;
    insert_hostel(&svc, "hst-a", "mixed").await;
    insert_room(&svc, "rom-a1", "hst-a", 4, 1).await;

    insert_student(&svc, "stu-01", "male").await;
    insert_student(&svc, "stu-02", "female").await;
    insert_submission(&svc, "stu-01", "2026-08-01T10:00:00+00:00").await;
    insert_occupant(&svc, "stu-03", "male", [4, 4, 4, 4], "rom-a1").await;

    let stats = svc.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_students, 3);
    assert_eq!(stats.with_questionnaire, 1);
    assert_eq!(stats.allocated, 1);
    assert_eq!(stats.pending_allocation, 2);
}
