//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Domain entities that are safe to expose (groups, students, summaries)
//! are serialized directly; the teacher account gets a dedicated DTO so
//! the password digest never leaves the server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{GroupId, SessionToken, StudentId, TeacherId};
use crate::models::{Group, Student, Teacher};
use crate::services::DayMark;

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Attendance taking
    AttendanceDetailRow, DaySheet, DaySheetRow,
    // Birthdays
    BirthdayBoard, BirthdayProjection, BirthdayStudent,
    // Calendar
    GroupDaySummary,
    // History
    DaySummary,
};
pub use crate::models::{GroupUpdate, NewGroup, NewStudent};
pub use crate::services::RegisterInput;

/// Teacher account as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherDto {
    pub id: TeacherId,
    pub email: String,
    pub full_name: String,
}

impl From<Teacher> for TeacherDto {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            email: teacher.email,
            full_name: teacher.full_name,
        }
    }
}

/// Response for account registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub teacher: TeacherDto,
    /// Message about the operation
    pub message: String,
}

/// Request body for login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: SessionToken,
    pub teacher: TeacherDto,
}

/// Group list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListResponse {
    /// List of the teacher's groups
    pub groups: Vec<Group>,
    /// Total count
    pub total: usize,
}

/// Student list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentListResponse {
    /// Students of the group, ordered by name
    pub students: Vec<Student>,
    /// Total count
    pub total: usize,
}

/// One student's mark in a record-attendance request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkEntry {
    pub student_id: StudentId,
    pub present: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for recording one day of attendance.
///
/// Marks need not cover the whole roster; unmarked students are saved as
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub marks: Vec<MarkEntry>,
}

impl RecordAttendanceRequest {
    /// Collapse the mark list into a per-student lookup (last mark wins).
    pub fn marks_by_student(&self) -> std::collections::HashMap<StudentId, DayMark> {
        self.marks
            .iter()
            .map(|m| {
                (
                    m.student_id,
                    DayMark {
                        present: m.present,
                        notes: m.notes.clone(),
                    },
                )
            })
            .collect()
    }
}

/// Response for recording one day of attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttendanceResponse {
    /// Number of entries written
    pub saved: usize,
    /// Message about the operation
    pub message: String,
}

/// Query parameters for the day sheet endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheetQuery {
    /// Target date (ISO `YYYY-MM-DD`)
    pub date: NaiveDate,
}

/// Query parameters for the calendar endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
    /// Restrict to one group (optional)
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

/// Query parameters for the CSV export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}
