//! Attendance aggregation.
//!
//! Pure folds from raw entry lists into per-date and per-(date, group)
//! summaries. Both functions count only what was recorded: a roster member
//! who was never marked on a date simply does not appear in that date's
//! totals (the CSV exporter deliberately uses the opposite convention,
//! see [`crate::services::csv_export`]).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::api::GroupId;
use crate::models::AttendanceEntry;
use crate::routes::calendar::GroupDaySummary;
use crate::routes::history::DaySummary;

/// Summarize entries per date, newest date first.
///
/// Deterministic: the output depends only on the entry multiset, not on
/// input order. An empty entry list yields an empty result.
pub fn summarize_by_date(entries: &[AttendanceEntry]) -> Vec<DaySummary> {
    let mut by_date: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for entry in entries {
        let (present, absent) = by_date.entry(entry.date).or_default();
        if entry.present {
            *present += 1;
        } else {
            *absent += 1;
        }
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, (present_count, absent_count))| DaySummary {
            date,
            total_students: present_count + absent_count,
            present_count,
            absent_count,
        })
        .collect()
}

/// Summarize entries per (date, group) for calendar cells.
///
/// `group_names` supplies display names; an entry whose group is missing
/// from the map keeps an empty name rather than being dropped.
pub fn summarize_by_date_and_group(
    entries: &[AttendanceEntry],
    group_names: &HashMap<GroupId, String>,
) -> Vec<GroupDaySummary> {
    let mut by_key: BTreeMap<(NaiveDate, GroupId), (usize, usize)> = BTreeMap::new();
    for entry in entries {
        let (present, absent) = by_key.entry((entry.date, entry.group_id)).or_default();
        if entry.present {
            *present += 1;
        } else {
            *absent += 1;
        }
    }

    by_key
        .into_iter()
        .map(|((date, group_id), (present_count, absent_count))| GroupDaySummary {
            date,
            group_id,
            group_name: group_names.get(&group_id).cloned().unwrap_or_default(),
            total_students: present_count + absent_count,
            present_count,
            absent_count,
        })
        .collect()
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod aggregator_tests;
