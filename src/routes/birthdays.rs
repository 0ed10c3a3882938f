use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{GroupId, StudentId};

// =========================================================
// Birthday types
// =========================================================

/// Input row for the birthday projector: a student joined with the name
/// of the group they belong to. Students without a recorded birth date
/// never reach this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayStudent {
    pub id: StudentId,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
    pub group_name: String,
}

/// A student's next birthday, projected from "today".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayProjection {
    pub id: StudentId,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub group_id: GroupId,
    pub group_name: String,
    /// Calendar days until the next occurrence; 0 on the birthday itself.
    pub days_until: i64,
    /// Age reached on that occurrence.
    pub age_turning: i32,
}

/// Birthdays within the horizon, split into today's and upcoming ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BirthdayBoard {
    pub today: Vec<BirthdayProjection>,
    pub upcoming: Vec<BirthdayProjection>,
}

/// Route function name constant for birthdays
pub const GET_BIRTHDAYS: &str = "get_upcoming_birthdays";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_default_is_empty() {
        let board = BirthdayBoard::default();
        assert!(board.today.is_empty());
        assert!(board.upcoming.is_empty());
    }

    #[test]
    fn test_projection_serde_roundtrip() {
        let projection = BirthdayProjection {
            id: StudentId::generate(),
            full_name: "Ana García".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 10).unwrap(),
            group_id: GroupId::generate(),
            group_name: "Inglés Beginners".to_string(),
            days_until: 0,
            age_turning: 34,
        };
        let json = serde_json::to_string(&projection).unwrap();
        let back: BirthdayProjection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.days_until, 0);
        assert_eq!(back.age_turning, 34);
    }
}
