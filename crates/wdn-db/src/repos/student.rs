//! Student repository.
//!
//! Registration, lookup, and listing. Students are created here; their trait
//! profiles and allocations are attached later by the trait-generation pass
//! and the allocation engine.

use chrono::Utc;

use wdn_core::entities::{AuditEntry, Student};
use wdn_core::enums::{AuditAction, EntityType, Gender, Level};
use wdn_core::ids::{PREFIX_AUDIT, PREFIX_STUDENT};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::WdnService;

impl WdnService {
    /// Register a new student.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the email is already registered or the
    /// INSERT fails.
    pub async fn register_student(
        &self,
        email: &str,
        name: &str,
        gender: Gender,
        level: Level,
        matric_no: &str,
    ) -> Result<Student, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STUDENT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO students (id, email, name, gender, level, matric_no, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    id.as_str(),
                    email,
                    name,
                    gender.as_str(),
                    level.as_str(),
                    matric_no,
                    now.to_rfc3339()
                ],
            )
            .await?;

        let student = Student {
            id: id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            gender,
            level,
            matric_no: matric_no.to_string(),
            created_at: now,
        };

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::Student,
            entity_id: id,
            action: AuditAction::Registered,
            detail: None,
            created_at: now,
        })
        .await?;

        Ok(student)
    }

    /// Get a student by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the student does not exist.
    pub async fn get_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, email, name, gender, level, matric_no, created_at
                 FROM students WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_student(&row)
    }

    /// Get a student by email.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no student has that email.
    pub async fn get_student_by_email(&self, email: &str) -> Result<Student, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, email, name, gender, level, matric_no, created_at
                 FROM students WHERE email = ?1",
                [email],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_student(&row)
    }

    /// List students ordered by ascending ID (the same deterministic order
    /// the allocation engine traverses).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students(&self, limit: u32) -> Result<Vec<Student>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, email, name, gender, level, matric_no, created_at
                 FROM students ORDER BY id ASC LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;

        let mut students = Vec::new();
        while let Some(row) = rows.next().await? {
            students.push(row_to_student(&row)?);
        }
        Ok(students)
    }
}

/// Convert a libSQL row to a `Student` struct.
fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get::<String>(0)?,
        email: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        gender: parse_enum(&row.get::<String>(3)?)?,
        level: parse_enum(&row.get::<String>(4)?)?,
        matric_no: row.get::<String>(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}
