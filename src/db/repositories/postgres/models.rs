use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{attendance, groups, sessions, students, teachers};
use crate::api::{EntryId, GroupId, SessionToken, StudentId, TeacherId};
use crate::models::{AttendanceEntry, Group, Session, Student, Teacher};

// Entity ids are generated by the application, so each table uses a single
// row struct for both reads and inserts.

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = teachers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeacherRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Teacher> for TeacherRow {
    fn from(t: &Teacher) -> Self {
        Self {
            id: t.id.value(),
            email: t.email.clone(),
            full_name: t.full_name.clone(),
            password_hash: t.password_hash.clone(),
            created_at: t.created_at,
        }
    }
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Self {
            id: TeacherId::new(row.id),
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    pub token: Uuid,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionRow {
    fn from(s: &Session) -> Self {
        Self {
            token: s.token.value(),
            teacher_id: s.teacher_id.value(),
            created_at: s.created_at,
        }
    }
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            token: SessionToken::new(row.token),
            teacher_id: TeacherId::new(row.teacher_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub name: String,
    pub place: String,
    pub schedule_date: NaiveDate,
    pub schedule_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id.value(),
            teacher_id: g.teacher_id.value(),
            name: g.name.clone(),
            place: g.place.clone(),
            schedule_date: g.schedule_date,
            schedule_time: g.schedule_time,
            description: g.description.clone(),
            created_at: g.created_at,
        }
    }
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: GroupId::new(row.id),
            teacher_id: TeacherId::new(row.teacher_id),
            name: row.name,
            place: row.place,
            schedule_date: row.schedule_date,
            schedule_time: row.schedule_time,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: Uuid,
    pub group_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id.value(),
            group_id: s.group_id.value(),
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            national_id: s.national_id.clone(),
            birth_date: s.birth_date,
            created_at: s.created_at,
        }
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: StudentId::new(row.id),
            group_id: GroupId::new(row.group_id),
            full_name: row.full_name,
            email: row.email,
            national_id: row.national_id,
            birth_date: row.birth_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendanceRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
    pub notes: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&AttendanceEntry> for AttendanceRow {
    fn from(e: &AttendanceEntry) -> Self {
        Self {
            id: e.id.value(),
            student_id: e.student_id.value(),
            group_id: e.group_id.value(),
            date: e.date,
            present: e.present,
            notes: e.notes.clone(),
            recorded_by: e.recorded_by.value(),
            created_at: e.created_at,
        }
    }
}

impl From<AttendanceRow> for AttendanceEntry {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: EntryId::new(row.id),
            student_id: StudentId::new(row.student_id),
            group_id: GroupId::new(row.group_id),
            date: row.date,
            present: row.present,
            notes: row.notes,
            recorded_by: TeacherId::new(row.recorded_by),
            created_at: row.created_at,
        }
    }
}
