//! Room repository.
//!
//! Candidate-room selection and occupant lookup for the allocation engine.

use wdn_core::entities::Room;
use wdn_core::enums::{Gender, GenderPolicy};
use wdn_core::profile::TraitVector;

use crate::error::DatabaseError;
use crate::helpers::{parse_enum, parse_trait_vector};
use crate::service::WdnService;

impl WdnService {
    /// Get a room by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the room does not exist.
    pub async fn get_room(&self, id: &str) -> Result<Room, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, hostel_id, room_number, capacity, occupied
                 FROM rooms WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_room(&row)
    }

    /// List the rooms of one hostel, ordered by ascending room ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_rooms(&self, hostel_id: &str) -> Result<Vec<Room>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, hostel_id, room_number, capacity, occupied
                 FROM rooms WHERE hostel_id = ?1 ORDER BY id ASC",
                [hostel_id],
            )
            .await?;

        let mut rooms = Vec::new();
        while let Some(row) = rows.next().await? {
            rooms.push(row_to_room(&row)?);
        }
        Ok(rooms)
    }

    /// Candidate rooms for a student: free capacity, and the owning hostel's
    /// gender policy admits the student.
    ///
    /// SQL filters capacity; the policy decision goes through
    /// [`GenderPolicy::admits`] so eligibility has a single definition.
    ///
    /// Ordered by hostel ID then room ID — this ordering is the documented
    /// tie-break for equally-scored rooms (first encountered wins), so it
    /// must stay deterministic.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored policy value
    /// is unknown.
    pub async fn load_candidate_rooms(&self, gender: Gender) -> Result<Vec<Room>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT r.id, r.hostel_id, r.room_number, r.capacity, r.occupied, h.gender
                 FROM rooms r
                 JOIN hostels h ON h.id = r.hostel_id
                 WHERE r.occupied < r.capacity
                 ORDER BY r.hostel_id ASC, r.id ASC",
                (),
            )
            .await?;

        let mut rooms = Vec::new();
        while let Some(row) = rows.next().await? {
            let policy: GenderPolicy = parse_enum(&row.get::<String>(5)?)?;
            if policy.admits(gender) {
                rooms.push(row_to_room(&row)?);
            }
        }
        Ok(rooms)
    }

    /// Trait vectors of a room's current occupants (students already
    /// allocated to it).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or stored traits are corrupt.
    pub async fn load_occupants(&self, room_id: &str) -> Result<Vec<TraitVector>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT t.chronotype, t.noise_sensitivity, t.sociability, t.study_focus
                 FROM allocations a
                 JOIN trait_profiles t ON t.student_id = a.student_id
                 WHERE a.room_id = ?1
                 ORDER BY a.student_id ASC",
                [room_id],
            )
            .await?;

        let mut occupants = Vec::new();
        while let Some(row) = rows.next().await? {
            occupants.push(parse_trait_vector(&row, 0)?);
        }
        Ok(occupants)
    }

}

/// Convert a libSQL row to a `Room` struct.
fn row_to_room(row: &libsql::Row) -> Result<Room, DatabaseError> {
    Ok(Room {
        id: row.get::<String>(0)?,
        hostel_id: row.get::<String>(1)?,
        room_number: row.get::<String>(2)?,
        capacity: row.get::<i64>(3)?,
        occupied: row.get::<i64>(4)?,
    })
}
