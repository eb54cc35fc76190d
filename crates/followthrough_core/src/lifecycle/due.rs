//! Due-date parsing and classification.
//!
//! # Invariants
//! - Comparison happens at day granularity only; any time-of-day suffix
//!   on a stored value is ignored.
//! - `today` is always supplied by the caller.

use crate::model::followup::{Followup, FollowupStatus};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Badge category used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueKind {
    Overdue,
    Soon,
    Due,
}

/// Classification result for one due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueBadge {
    pub kind: DueKind,
    pub label: String,
}

/// Parses the calendar-date prefix of `value`.
///
/// Returns `None` unless the first ten characters form a real
/// `YYYY-MM-DD` date.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Signed day difference `due_at - today`; negative means past.
pub fn days_from_today(due_at: &str, today: NaiveDate) -> Option<i64> {
    parse_due_date(due_at).map(|due| (due - today).num_days())
}

pub fn classify_due(due_at: &str, today: NaiveDate) -> DueBadge {
    let Some(diff) = days_from_today(due_at, today) else {
        return badge(DueKind::Due, "No date".to_string());
    };

    match diff {
        d if d < 0 => badge(DueKind::Overdue, format!("Overdue ({}d)", d.abs())),
        0 => badge(DueKind::Soon, "Due today".to_string()),
        1 => badge(DueKind::Soon, "Due tomorrow".to_string()),
        d if d <= 7 => badge(DueKind::Soon, format!("Due in {d}d")),
        d => badge(DueKind::Due, format!("Due in {d}d")),
    }
}

/// Strictly in the past. Unparseable dates are never overdue.
pub fn is_overdue(due_at: &str, today: NaiveDate) -> bool {
    days_from_today(due_at, today).is_some_and(|diff| diff < 0)
}

pub fn is_due_today(due_at: &str, today: NaiveDate) -> bool {
    days_from_today(due_at, today) == Some(0)
}

/// Open work that needs the owner's attention today: anything in
/// `followup`, or anything overdue or due today, excluding `done`.
pub fn needs_attention_today(followup: &Followup, today: NaiveDate) -> bool {
    match followup.status {
        FollowupStatus::Done => false,
        FollowupStatus::Followup => true,
        _ => is_overdue(&followup.due_at, today) || is_due_today(&followup.due_at, today),
    }
}

/// Overdue and not yet done.
pub fn is_overdue_open(followup: &Followup, today: NaiveDate) -> bool {
    !followup.is_done() && is_overdue(&followup.due_at, today)
}

fn badge(kind: DueKind, label: String) -> DueBadge {
    DueBadge { kind, label }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        parse_due_date(value).expect("test date should parse")
    }

    #[test]
    fn parse_ignores_time_suffix_and_rejects_garbage() {
        assert_eq!(
            parse_due_date("2026-01-10T09:30:00.000Z"),
            Some(date("2026-01-10"))
        );
        assert_eq!(parse_due_date("2026-01-10 18:00:00"), Some(date("2026-01-10")));
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("soon"), None);
        assert_eq!(parse_due_date("2026-13-01"), None);
        assert_eq!(parse_due_date("2026-02-30"), None);
    }

    #[test]
    fn classify_covers_every_band() {
        let today = date("2026-01-10");
        let cases = [
            ("2026-01-05", DueKind::Overdue, "Overdue (5d)"),
            ("2026-01-10", DueKind::Soon, "Due today"),
            ("2026-01-11", DueKind::Soon, "Due tomorrow"),
            ("2026-01-17", DueKind::Soon, "Due in 7d"),
            ("2026-01-18", DueKind::Due, "Due in 8d"),
            ("2026-01-20", DueKind::Due, "Due in 10d"),
            ("not a date", DueKind::Due, "No date"),
        ];
        for (due_at, kind, label) in cases {
            let badge = classify_due(due_at, today);
            assert_eq!(badge.kind, kind, "due_at={due_at}");
            assert_eq!(badge.label, label, "due_at={due_at}");
        }
    }

    #[test]
    fn day_difference_crosses_month_and_year() {
        let today = date("2026-01-02");
        assert_eq!(days_from_today("2025-12-31", today), Some(-2));
        assert_eq!(days_from_today("2026-02-01", today), Some(30));
        assert_eq!(days_from_today("garbage", today), None);
    }

    #[test]
    fn add_days_formats_back_to_ymd() {
        assert_eq!(format_date(add_days(date("2026-01-30"), 3)), "2026-02-02");
    }
}
