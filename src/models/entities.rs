//! Core entity definitions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{EntryId, GroupId, SessionToken, StudentId, TeacherId};

/// A registered teacher. Teachers own groups; every repository query is
/// scoped by the teacher id so tenants never observe each other's data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub email: String,
    pub full_name: String,
    /// Salted password digest in `salt$hex` form. Never exposed over HTTP.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Teacher {
    pub fn new(
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: TeacherId::generate(),
            email: email.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// A cohort of students meeting at a scheduled place and time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub teacher_id: TeacherId,
    pub name: String,
    pub place: String,
    pub schedule_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input fields for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub place: String,
    pub schedule_date: NaiveDate,
    #[serde(default)]
    pub schedule_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replacement of a group's editable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub name: String,
    pub place: String,
    pub schedule_date: NaiveDate,
    #[serde(default)]
    pub schedule_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Group {
    pub fn new(teacher_id: TeacherId, fields: NewGroup) -> Self {
        Self {
            id: GroupId::generate(),
            teacher_id,
            name: fields.name,
            place: fields.place,
            schedule_date: fields.schedule_date,
            schedule_time: fields.schedule_time,
            description: fields.description,
            created_at: Utc::now(),
        }
    }

    /// Apply an update, leaving id, owner and creation time untouched.
    pub fn apply(&mut self, update: GroupUpdate) {
        self.name = update.name;
        self.place = update.place;
        self.schedule_date = update.schedule_date;
        self.schedule_time = update.schedule_time;
        self.description = update.description;
    }
}

/// A student enrolled in exactly one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub group_id: GroupId,
    pub full_name: String,
    pub email: String,
    pub national_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Input fields for enrolling a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub full_name: String,
    pub email: String,
    pub national_id: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Student {
    pub fn new(group_id: GroupId, fields: NewStudent) -> Self {
        Self {
            id: StudentId::generate(),
            group_id,
            full_name: fields.full_name,
            email: fields.email,
            national_id: fields.national_id,
            birth_date: fields.birth_date,
            created_at: Utc::now(),
        }
    }
}

/// One (student, date) attendance record.
///
/// Unique per `(student_id, date)`: entries are only ever written through
/// the day replacement operation, never updated individually, so for a
/// given `(group, date)` the stored set is either empty or exactly one
/// entry per student supplied in the save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: EntryId,
    pub student_id: StudentId,
    pub group_id: GroupId,
    pub date: NaiveDate,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_by: TeacherId,
    pub created_at: DateTime<Utc>,
}

/// An authenticated session. The token is an opaque bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub teacher_id: TeacherId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(teacher_id: TeacherId) -> Self {
        Self {
            token: SessionToken::generate(),
            teacher_id,
            created_at: Utc::now(),
        }
    }
}
