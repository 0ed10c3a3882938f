//! CSV export of attendance sheets.
//!
//! Produces a dense date×student matrix: one column per date that has at
//! least one recorded entry inside the range, one row per roster member.
//! Because every cell must carry a value, a student with no entry on an
//! emitted date column reads "Ausente"; the aggregator, in contrast,
//! only counts recorded entries.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::api::{GroupId, StudentId, TeacherId};
use crate::db::repository::{
    AttendanceRepository, FullRepository, GroupRepository, RepositoryResult, StudentRepository,
};
use crate::models::{AttendanceEntry, Group, Student};

/// Render the attendance sheet for `students` over `[date_from, date_to]`.
///
/// Column set is the sorted unique entry dates within the range, not every
/// calendar day. Rows follow the given roster order. Percentage has one
/// decimal; with zero date columns it is the literal `0` (no division).
/// Text fields are quoted; lines end with `\n`.
pub fn export_csv(
    students: &[Student],
    entries: &[AttendanceEntry],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> String {
    let in_range = |d: &NaiveDate| *d >= date_from && *d <= date_to;
    let dates: BTreeSet<NaiveDate> = entries
        .iter()
        .map(|e| e.date)
        .filter(in_range)
        .collect();

    let present_by_key: HashMap<(StudentId, NaiveDate), bool> = entries
        .iter()
        .filter(|e| in_range(&e.date))
        .map(|e| ((e.student_id, e.date), e.present))
        .collect();

    let mut out = String::new();
    out.push_str("Nombre Completo,Email,DNI");
    for day in &dates {
        out.push(',');
        out.push_str(&day.format("%d/%m/%Y").to_string());
    }
    out.push_str(",Total Presentes,Total Ausentes,% Asistencia\n");

    for student in students {
        out.push_str(&format!(
            "\"{}\",\"{}\",\"{}\"",
            quote(&student.full_name),
            quote(&student.email),
            quote(&student.national_id)
        ));

        let mut total_present = 0usize;
        let mut total_absent = 0usize;
        for day in &dates {
            let present = present_by_key
                .get(&(student.id, *day))
                .copied()
                .unwrap_or(false);
            if present {
                total_present += 1;
                out.push_str(",\"Presente\"");
            } else {
                total_absent += 1;
                out.push_str(",\"Ausente\"");
            }
        }

        let percentage = if dates.is_empty() {
            "0".to_string()
        } else {
            format!("{:.1}", total_present as f64 / dates.len() as f64 * 100.0)
        };
        out.push_str(&format!(
            ",{},{},{}%\n",
            total_present, total_absent, percentage
        ));
    }

    out
}

/// Suggested download name: `asistencia_<grupo>_<desde>_<hasta>.csv`.
pub fn export_filename(group: &Group, date_from: NaiveDate, date_to: NaiveDate) -> String {
    format!(
        "asistencia_{}_{}_{}.csv",
        group.name.replace(char::is_whitespace, "_"),
        date_from.format("%d-%m-%Y"),
        date_to.format("%d-%m-%Y")
    )
}

fn quote(field: &str) -> String {
    field.replace('"', "\"\"")
}

/// Load a group's roster and entries and render its sheet.
///
/// Returns the suggested filename together with the CSV payload; delivery
/// (headers, download) stays with the caller.
pub async fn export_group_csv(
    repo: &dyn FullRepository,
    teacher: TeacherId,
    group: GroupId,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> RepositoryResult<(String, String)> {
    let group = repo.get_group(teacher, group).await?;
    let students = repo.list_students(teacher, group.id).await?;
    let entries = repo
        .fetch_range(teacher, Some(group.id), date_from, date_to)
        .await?;

    let csv = export_csv(&students, &entries, date_from, date_to);
    Ok((export_filename(&group, date_from, date_to), csv))
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod csv_export_tests;
