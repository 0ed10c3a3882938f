//! Attendance recording and browsing.
//!
//! The recorder turns the group roster plus the teacher's marks into a
//! complete entry set for one (group, date) and hands it to the
//! repository's atomic day replacement. The read side merges saved
//! entries back into editable day sheets and summarizes history and
//! calendar views.

use std::collections::HashMap;

use chrono::{Days, Months, NaiveDate};

use crate::api::{GroupId, StudentId, TeacherId};
use crate::db::models::NewAttendanceEntry;
use crate::db::repository::{
    AttendanceRepository, FullRepository, GroupRepository, RepositoryError, RepositoryResult,
    StudentRepository,
};
use crate::models::Student;
use crate::routes::attendance::{AttendanceDetailRow, DaySheet, DaySheetRow};
use crate::routes::calendar::GroupDaySummary;
use crate::routes::history::DaySummary;
use crate::services::aggregator;

/// A single student's mark as edited on the day sheet.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DayMark {
    pub present: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Build the full entry set for a day from roster and marks.
///
/// Marks need not cover the roster: unmarked students default to absent
/// with no notes. Marks for students no longer on the roster are ignored.
pub fn merge_marks(
    roster: &[Student],
    marks: &HashMap<StudentId, DayMark>,
    recorded_by: TeacherId,
) -> Vec<NewAttendanceEntry> {
    roster
        .iter()
        .map(|student| {
            let mark = marks.get(&student.id);
            NewAttendanceEntry {
                student_id: student.id,
                present: mark.map(|m| m.present).unwrap_or(false),
                notes: mark
                    .and_then(|m| m.notes.clone())
                    .filter(|n| !n.trim().is_empty()),
                recorded_by,
            }
        })
        .collect()
}

/// Record one day of attendance for a group.
///
/// Replaces whatever was saved for the date with one entry per current
/// roster member. Retrying with identical input saves an identical set;
/// two sessions saving the same day remain last-writer-wins.
pub async fn record_day(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    group: GroupId,
    date: NaiveDate,
    marks: &HashMap<StudentId, DayMark>,
) -> RepositoryResult<usize> {
    let roster = repo.list_students(teacher, group).await?;
    let entries = merge_marks(&roster, marks, teacher);
    log::debug!(
        "replacing attendance for group {} on {} ({} entries)",
        group,
        date,
        entries.len()
    );
    repo.replace_day(teacher, group, date, entries).await
}

/// Load the editable sheet for `(group, date)`.
///
/// Saved marks and notes win over defaults; students added to the group
/// after the day was recorded appear as unmarked.
pub async fn day_sheet(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    group: GroupId,
    date: NaiveDate,
) -> RepositoryResult<DaySheet> {
    let roster = repo.list_students(teacher, group).await?;
    let saved = repo.fetch_day(teacher, group, date).await?;
    let already_recorded = !saved.is_empty();
    let by_student: HashMap<StudentId, _> =
        saved.into_iter().map(|e| (e.student_id, e)).collect();

    let rows = roster
        .into_iter()
        .map(|student| match by_student.get(&student.id) {
            Some(entry) => DaySheetRow {
                present: entry.present,
                notes: entry.notes.clone(),
                student,
            },
            None => DaySheetRow {
                student,
                present: false,
                notes: None,
            },
        })
        .collect();

    Ok(DaySheet {
        date,
        already_recorded,
        rows,
    })
}

/// Per-date history of a group, newest first.
pub async fn history(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    group: GroupId,
) -> RepositoryResult<Vec<DaySummary>> {
    let entries = repo.fetch_group_entries(teacher, group).await?;
    Ok(aggregator::summarize_by_date(&entries))
}

/// First and last day of a month.
fn month_bounds(year: i32, month: u32) -> RepositoryResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        RepositoryError::validation(format!("invalid month: {}-{}", year, month))
    })?;
    let last = first + Months::new(1) - Days::new(1);
    Ok((first, last))
}

/// Calendar cells for one month, optionally restricted to a single group.
pub async fn calendar(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    year: i32,
    month: u32,
    group: Option<GroupId>,
) -> RepositoryResult<Vec<GroupDaySummary>> {
    let (from, to) = month_bounds(year, month)?;
    let entries = repo.fetch_range(teacher, group, from, to).await?;
    let names: HashMap<GroupId, String> = repo
        .list_groups(teacher)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();
    Ok(aggregator::summarize_by_date_and_group(&entries, &names))
}

/// The saved entries of one recorded day, joined with student names and
/// ordered by name.
pub async fn day_detail(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    group: GroupId,
    date: NaiveDate,
) -> RepositoryResult<Vec<AttendanceDetailRow>> {
    let entries = repo.fetch_day(teacher, group, date).await?;
    let roster = repo.list_students(teacher, group).await?;
    let names: HashMap<StudentId, String> = roster
        .into_iter()
        .map(|s| (s.id, s.full_name))
        .collect();

    let mut rows: Vec<AttendanceDetailRow> = entries
        .into_iter()
        .map(|entry| AttendanceDetailRow {
            student_name: names
                .get(&entry.student_id)
                .cloned()
                .unwrap_or_default(),
            student_id: entry.student_id,
            present: entry.present,
            notes: entry.notes,
        })
        .collect();
    rows.sort_by(|a, b| a.student_name.cmp(&b.student_name));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewStudent;

    fn student(name: &str) -> Student {
        Student::new(
            crate::api::GroupId::generate(),
            NewStudent {
                full_name: name.to_string(),
                email: format!("{}@example.com", name),
                national_id: "30123456".to_string(),
                birth_date: None,
            },
        )
    }

    #[test]
    fn test_merge_marks_defaults_to_absent() {
        let roster = vec![student("ana"), student("bruno")];
        let teacher = TeacherId::generate();
        let mut marks = HashMap::new();
        marks.insert(
            roster[0].id,
            DayMark {
                present: true,
                notes: Some("llegó tarde".to_string()),
            },
        );

        let entries = merge_marks(&roster, &marks, teacher);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].present);
        assert_eq!(entries[0].notes.as_deref(), Some("llegó tarde"));
        assert!(!entries[1].present);
        assert!(entries[1].notes.is_none());
    }

    #[test]
    fn test_merge_marks_ignores_unknown_students() {
        let roster = vec![student("ana")];
        let teacher = TeacherId::generate();
        let mut marks = HashMap::new();
        marks.insert(
            StudentId::generate(),
            DayMark {
                present: true,
                notes: None,
            },
        );

        let entries = merge_marks(&roster, &marks, teacher);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].student_id, roster[0].id);
        assert!(!entries[0].present);
    }

    #[test]
    fn test_merge_marks_drops_blank_notes() {
        let roster = vec![student("ana")];
        let teacher = TeacherId::generate();
        let mut marks = HashMap::new();
        marks.insert(
            roster[0].id,
            DayMark {
                present: true,
                notes: Some("   ".to_string()),
            },
        );

        let entries = merge_marks(&roster, &marks, teacher);
        assert!(entries[0].notes.is_none());
    }

    #[test]
    fn test_month_bounds() {
        let (from, to) = month_bounds(2024, 2).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (from, to) = month_bounds(2023, 12).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }
}
