//! Hostel repository.
//!
//! Hostels are created together with their rooms in one transaction, and
//! deleted with a cascade (allocations → rooms → hostel) so no orphaned
//! rows survive.

use chrono::Utc;

use wdn_core::entities::{AuditEntry, Hostel, Room};
use wdn_core::enums::{AuditAction, EntityType, GenderPolicy};
use wdn_core::ids::{PREFIX_AUDIT, PREFIX_HOSTEL, PREFIX_ROOM};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::WdnService;

/// Room shape for hostel creation: number and capacity.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub room_number: String,
    pub capacity: i64,
}

impl WdnService {
    /// Create a hostel and its rooms in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if `rooms` is empty, or
    /// `DatabaseError` if any INSERT fails (nothing is persisted then).
    pub async fn create_hostel(
        &self,
        name: &str,
        location: &str,
        warden: &str,
        gender: GenderPolicy,
        rooms: &[NewRoom],
    ) -> Result<(Hostel, Vec<Room>), DatabaseError> {
        if rooms.is_empty() {
            return Err(DatabaseError::InvalidState(
                "a hostel needs at least one room".into(),
            ));
        }

        let now = Utc::now();
        let hostel_id = self.db().generate_id(PREFIX_HOSTEL).await?;
        let mut room_ids = Vec::with_capacity(rooms.len());
        for _ in rooms {
            room_ids.push(self.db().generate_id(PREFIX_ROOM).await?);
        }

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO hostels (id, name, location, warden, gender, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            libsql::params![
                hostel_id.as_str(),
                name,
                location,
                warden,
                gender.as_str(),
                now.to_rfc3339()
            ],
        )
        .await?;

        for (spec, room_id) in rooms.iter().zip(&room_ids) {
            tx.execute(
                "INSERT INTO rooms (id, hostel_id, room_number, capacity, occupied)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                libsql::params![
                    room_id.as_str(),
                    hostel_id.as_str(),
                    spec.room_number.as_str(),
                    spec.capacity
                ],
            )
            .await?;
        }
        tx.commit().await?;

        let hostel = Hostel {
            id: hostel_id.clone(),
            name: name.to_string(),
            location: location.to_string(),
            warden: warden.to_string(),
            gender,
            created_at: now,
        };
        let created_rooms = rooms
            .iter()
            .zip(room_ids)
            .map(|(spec, id)| Room {
                id,
                hostel_id: hostel_id.clone(),
                room_number: spec.room_number.clone(),
                capacity: spec.capacity,
                occupied: 0,
            })
            .collect::<Vec<_>>();

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::Hostel,
            entity_id: hostel_id,
            action: AuditAction::HostelCreated,
            detail: Some(serde_json::json!({
                "name": name,
                "rooms": created_rooms.len(),
            })),
            created_at: now,
        })
        .await?;

        Ok((hostel, created_rooms))
    }

    /// Get a hostel by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the hostel does not exist.
    pub async fn get_hostel(&self, id: &str) -> Result<Hostel, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, location, warden, gender, created_at
                 FROM hostels WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_hostel(&row)
    }

    /// List all hostels ordered by ascending ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_hostels(&self) -> Result<Vec<Hostel>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, location, warden, gender, created_at
                 FROM hostels ORDER BY id ASC",
                (),
            )
            .await?;

        let mut hostels = Vec::new();
        while let Some(row) = rows.next().await? {
            hostels.push(row_to_hostel(&row)?);
        }
        Ok(hostels)
    }

    /// Delete a hostel and all related data in one transaction:
    /// allocations in its rooms, then the rooms, then the hostel itself.
    ///
    /// This is the only path that ever deletes allocation rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails (nothing is deleted then).
    pub async fn delete_hostel(&self, hostel_id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "DELETE FROM allocations WHERE room_id IN
             (SELECT id FROM rooms WHERE hostel_id = ?1)",
            [hostel_id],
        )
        .await?;
        tx.execute("DELETE FROM rooms WHERE hostel_id = ?1", [hostel_id])
            .await?;
        tx.execute("DELETE FROM hostels WHERE id = ?1", [hostel_id])
            .await?;
        tx.commit().await?;

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::Hostel,
            entity_id: hostel_id.to_string(),
            action: AuditAction::HostelDeleted,
            detail: None,
            created_at: now,
        })
        .await?;

        Ok(())
    }
}

/// Convert a libSQL row to a `Hostel` struct.
fn row_to_hostel(row: &libsql::Row) -> Result<Hostel, DatabaseError> {
    Ok(Hostel {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        location: row.get::<String>(2)?,
        warden: row.get::<String>(3)?,
        gender: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}
