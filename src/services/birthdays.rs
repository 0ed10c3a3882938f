//! Birthday projection.
//!
//! Computes, for each student with a recorded birth date, the days until
//! the next occurrence of their birthday and the age they reach on it,
//! then keeps the ones inside the forward horizon.

use chrono::{Datelike, NaiveDate};

use crate::api::TeacherId;
use crate::db::repository::{FullRepository, RepositoryResult, StudentRepository};
use crate::routes::birthdays::{BirthdayBoard, BirthdayProjection, BirthdayStudent};

/// Forward window within which birthdays are surfaced.
pub const DEFAULT_HORIZON_DAYS: i64 = 90;

/// The birthday's occurrence in `year`. Feb-29 birthdays fall on Feb-28
/// in non-leap years.
fn occurrence_in(year: i32, birth: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day()).or_else(|| {
        if birth.month() == 2 && birth.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Project a single student's next birthday from `today`.
///
/// The candidate is this year's occurrence, rolled to next year when it
/// already passed (date-only comparison; the occurrence on `today` itself
/// stays in this year). `age_turning` is the age reached on that
/// occurrence.
pub fn project(student: &BirthdayStudent, today: NaiveDate) -> Option<BirthdayProjection> {
    let birth = student.birth_date;
    let mut candidate = occurrence_in(today.year(), birth)?;
    if candidate < today {
        candidate = occurrence_in(today.year() + 1, birth)?;
    }

    Some(BirthdayProjection {
        id: student.id,
        full_name: student.full_name.clone(),
        birth_date: birth,
        group_id: student.group_id,
        group_name: student.group_name.clone(),
        days_until: (candidate - today).num_days(),
        age_turning: candidate.year() - birth.year(),
    })
}

/// Bucket the students whose next birthday is within `horizon_days`.
///
/// `today` holds the ones whose birthday is today, `upcoming` the rest,
/// both ascending by `days_until`.
pub fn upcoming_birthdays(
    students: &[BirthdayStudent],
    today: NaiveDate,
    horizon_days: i64,
) -> BirthdayBoard {
    let mut within: Vec<BirthdayProjection> = students
        .iter()
        .filter_map(|s| project(s, today))
        .filter(|p| p.days_until <= horizon_days)
        .collect();
    within.sort_by_key(|p| p.days_until);

    let (today_bucket, upcoming) = within.into_iter().partition(|p| p.days_until == 0);
    BirthdayBoard {
        today: today_bucket,
        upcoming,
    }
}

/// Load the teacher's students and build their birthday board.
pub async fn upcoming_for_teacher(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    today: NaiveDate,
) -> RepositoryResult<BirthdayBoard> {
    let students = repo.list_birthday_students(teacher).await?;
    Ok(upcoming_birthdays(&students, today, DEFAULT_HORIZON_DAYS))
}

#[cfg(test)]
#[path = "birthdays_tests.rs"]
mod birthdays_tests;
