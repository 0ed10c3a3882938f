use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// History types
// =========================================================

/// Per-date attendance summary for a group's history list.
///
/// `total_students` counts recorded entries for the date, not the roster
/// size: a student who was never marked on a date does not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_students: usize,
    pub present_count: usize,
    pub absent_count: usize,
}

/// Route function name constant for history
pub const GET_HISTORY: &str = "get_attendance_history";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_summary_serde_roundtrip() {
        let summary = DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            total_students: 12,
            present_count: 9,
            absent_count: 3,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: DaySummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
        assert!(json.contains("2024-03-10"));
    }
}
