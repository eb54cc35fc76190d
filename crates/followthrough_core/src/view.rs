//! List view selectors.
//!
//! # Responsibility
//! - Derive the visible follow-up list from explicit view state.
//! - Compute attention counters and risk annotations for list rendering.
//!
//! # Invariants
//! - Selectors are pure; view state is always passed in.
//! - Counters are computed over all items, never the filtered subset.
//! - Sorting is stable, so equal keys keep their input order.

use crate::lifecycle::{
    is_overdue, is_overdue_open, needs_attention_today, parse_due_date, risk, RiskAssessment,
};
use crate::model::followup::{Followup, FollowupStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(FollowupStatus),
}

impl StatusFilter {
    /// Parses `all` or a status value. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        FollowupStatus::parse(value).map(Self::Only)
    }

    pub fn matches(self, status: FollowupStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DueAt,
    CreatedAt,
    Company,
    Risk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Explicit list view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub status_filter: StatusFilter,
    pub sort_by: SortKey,
    pub sort_dir: SortDir,
}

/// Attention counters across the whole workspace list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub needs_today: usize,
    pub overdue: usize,
}

/// One follow-up paired with its advisory risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessedFollowup {
    pub item: Followup,
    pub risk: RiskAssessment,
}

/// Filters and sorts `items` according to `state`.
pub fn visible<'a>(items: &'a [Followup], state: &ViewState, today: NaiveDate) -> Vec<&'a Followup> {
    let needle = state.query.trim().to_lowercase();

    let mut filtered: Vec<&Followup> = items
        .iter()
        .filter(|item| state.status_filter.matches(item.status))
        .filter(|item| needle.is_empty() || haystack(item).contains(&needle))
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = compare(a, b, state.sort_by, today);
        match state.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });

    filtered
}

pub fn counters(items: &[Followup], today: NaiveDate) -> Counters {
    Counters {
        needs_today: items
            .iter()
            .filter(|item| needs_attention_today(item, today))
            .count(),
        overdue: items.iter().filter(|item| is_overdue_open(item, today)).count(),
    }
}

/// First non-done overdue record in display order.
pub fn first_overdue_id<'a>(visible: &[&'a Followup], today: NaiveDate) -> Option<&'a str> {
    visible
        .iter()
        .copied()
        .find(|item| !item.is_done() && is_overdue(&item.due_at, today))
        .map(|item| item.id.as_str())
}

pub fn annotate_risk(items: &[Followup], today: NaiveDate) -> Vec<AssessedFollowup> {
    items
        .iter()
        .map(|item| AssessedFollowup {
            item: item.clone(),
            risk: risk(item, today),
        })
        .collect()
}

fn haystack(item: &Followup) -> String {
    format!(
        "{} {} {}",
        item.contact_name, item.company_name, item.next_step
    )
    .to_lowercase()
}

fn compare(a: &Followup, b: &Followup, key: SortKey, today: NaiveDate) -> Ordering {
    match key {
        SortKey::DueAt => timestamp_key(&a.due_at).cmp(&timestamp_key(&b.due_at)),
        SortKey::CreatedAt => timestamp_key(&a.created_at).cmp(&timestamp_key(&b.created_at)),
        SortKey::Company => a
            .company_name
            .to_lowercase()
            .cmp(&b.company_name.to_lowercase()),
        SortKey::Risk => risk(a, today).score.cmp(&risk(b, today).score),
    }
}

/// Sort key for date-ish text. Unparseable values sort first (`None`).
fn timestamp_key(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if let Some(prefix) = trimmed.get(..19) {
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(prefix, format) {
                return Some(parsed);
            }
        }
    }
    parse_due_date(trimmed).and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_key_accepts_dates_and_datetimes() {
        assert!(timestamp_key("2026-01-10").is_some());
        assert!(timestamp_key("2026-01-10 08:30:00").is_some());
        assert!(timestamp_key("2026-01-10T08:30:00.000Z").is_some());
        assert!(timestamp_key("tomorrow").is_none());
        assert!(timestamp_key("2026-01-10 08:30:00") > timestamp_key("2026-01-10"));
    }

    #[test]
    fn status_filter_parse() {
        assert_eq!(StatusFilter::parse("ALL"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("waiting"),
            Some(StatusFilter::Only(FollowupStatus::Waiting))
        );
        assert_eq!(StatusFilter::parse("late"), None);
        assert!(StatusFilter::All.matches(FollowupStatus::Done));
        assert!(!StatusFilter::Only(FollowupStatus::Open).matches(FollowupStatus::Done));
    }
}
