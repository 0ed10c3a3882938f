use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::StudentId;
use crate::models::Student;

// =========================================================
// Attendance-taking types
// =========================================================

/// One roster line of the day sheet: the student plus the mark the sheet
/// currently shows (saved state if the day was recorded, defaults
/// otherwise).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheetRow {
    pub student: Student,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The editable attendance sheet for one (group, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySheet {
    pub date: NaiveDate,
    /// Whether the date already has saved entries; saving again replaces them.
    pub already_recorded: bool,
    pub rows: Vec<DaySheetRow>,
}

/// One saved entry of a recorded day, joined with the student's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceDetailRow {
    pub student_id: StudentId,
    pub student_name: String,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Route function name constants for attendance taking
pub const GET_DAY_SHEET: &str = "get_day_sheet";
pub const RECORD_DAY: &str = "record_day";
pub const GET_DAY_DETAIL: &str = "get_day_detail";
