//! Shared fixtures for the wdn-db integration suites.
//!
//! Students, profiles, hostels, and rooms are inserted with fixed IDs via
//! direct SQL so tests control the deterministic orderings the engine
//! traverses (cohort by student ID, candidates by hostel then room ID).

#![allow(dead_code)]

use wdn_config::AllocationConfig;
use wdn_db::service::WdnService;

pub async fn service() -> WdnService {
    WdnService::new_local(":memory:", AllocationConfig::default())
        .await
        .unwrap()
}

pub async fn insert_student(svc: &WdnService, id: &str, gender: &str) {
    svc.db()
        .conn()
        .execute(
            "INSERT INTO students (id, email, name, gender, level, matric_no, created_at)
             VALUES (?1, ?1 || '@school.edu', 'Student ' || ?1, ?2, '100', 'MAT/' || ?1, datetime('now'))",
            libsql::params![id, gender],
        )
        .await
        .unwrap();
}

pub async fn insert_profile(svc: &WdnService, student_id: &str, traits: [i64; 4]) {
    svc.db()
        .conn()
        .execute(
            "INSERT INTO trait_profiles
             (student_id, chronotype, noise_sensitivity, sociability, study_focus, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
            libsql::params![student_id, traits[0], traits[1], traits[2], traits[3]],
        )
        .await
        .unwrap();
}

pub async fn insert_submission(svc: &WdnService, student_id: &str, submitted_at: &str) {
    svc.db()
        .conn()
        .execute(
            "INSERT INTO questionnaire_responses (student_id, answers, submitted_at)
             VALUES (?1, '[]', ?2)",
            libsql::params![student_id, submitted_at],
        )
        .await
        .unwrap();
}

pub async fn insert_hostel(svc: &WdnService, id: &str, gender: &str) {
    svc.db()
        .conn()
        .execute(
            "INSERT INTO hostels (id, name, location, warden, gender, created_at)
             VALUES (?1, 'Hall ' || ?1, 'Campus', 'Warden ' || ?1, ?2, datetime('now'))",
            libsql::params![id, gender],
        )
        .await
        .unwrap();
}

pub async fn insert_room(
    svc: &WdnService,
    id: &str,
    hostel_id: &str,
    capacity: i64,
    occupied: i64,
) {
    svc.db()
        .conn()
        .execute(
            "INSERT INTO rooms (id, hostel_id, room_number, capacity, occupied)
             VALUES (?1, ?2, 'R-' || ?1, ?3, ?4)",
            libsql::params![id, hostel_id, capacity, occupied],
        )
        .await
        .unwrap();
}

/// A student already allocated into `room_id`, with a trait profile, so
/// candidate rooms have real occupants to score against.
pub async fn insert_occupant(
    svc: &WdnService,
    student_id: &str,
    gender: &str,
    traits: [i64; 4],
    room_id: &str,
) {
    insert_student(svc, student_id, gender).await;
    insert_profile(svc, student_id, traits).await;
    svc.db()
        .conn()
        .execute(
            "INSERT INTO allocations (id, student_id, room_id, compatibility_score, allocated_at)
             VALUES ('alc-' || ?1, ?1, ?2, 0, datetime('now'))",
            libsql::params![student_id, room_id],
        )
        .await
        .unwrap();
}

pub async fn room_occupied(svc: &WdnService, room_id: &str) -> i64 {
    let mut rows = svc
        .db()
        .conn()
        .query("SELECT occupied FROM rooms WHERE id = ?1", [room_id])
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

pub async fn allocated_room(svc: &WdnService, student_id: &str) -> Option<(String, i64)> {
    let mut rows = svc
        .db()
        .conn()
        .query(
            "SELECT room_id, compatibility_score FROM allocations WHERE student_id = ?1",
            [student_id],
        )
        .await
        .unwrap();
    rows.next()
        .await
        .unwrap()
        .map(|row| (row.get::<String>(0).unwrap(), row.get::<i64>(1).unwrap()))
}
