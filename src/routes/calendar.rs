use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::GroupId;

// =========================================================
// Calendar types
// =========================================================

/// Per-(date, group) attendance summary used to fill calendar cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDaySummary {
    pub date: NaiveDate,
    pub group_id: GroupId,
    pub group_name: String,
    pub total_students: usize,
    pub present_count: usize,
    pub absent_count: usize,
}

/// Route function name constant for the calendar view
pub const GET_CALENDAR: &str = "get_calendar_summaries";
