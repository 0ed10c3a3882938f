//! Row-shaped helper types shared by repository implementations.

pub use crate::models::{AttendanceEntry, Group, GroupUpdate, NewGroup, NewStudent, Session,
    Student, Teacher};

use crate::api::{StudentId, TeacherId};

/// One row of a day replacement: the mark for a single roster member.
///
/// Entry id, group, date and creation time are assigned by the repository
/// when the day is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendanceEntry {
    pub student_id: StudentId,
    pub present: bool,
    pub notes: Option<String>,
    pub recorded_by: TeacherId,
}
