//! Transition planning for "advance" and "snooze" actions.
//!
//! Planning never mutates the input record; the caller persists the
//! resulting patch.

use super::due::{add_days, format_date, parse_due_date};
use super::status::next_status;
use crate::model::followup::{Followup, FollowupPatch, FollowupStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SENT_WAIT_DAYS: i64 = 3;
const WAITING_WAIT_DAYS: i64 = 7;

/// Planned outcome of advancing one follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPlan {
    pub status: FollowupStatus,
    /// `None` leaves the stored due date untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<NaiveDate>,
}

impl TransitionPlan {
    pub fn into_patch(self) -> FollowupPatch {
        FollowupPatch {
            status: Some(self.status),
            due_at: self.due_at.map(format_date),
            next_step: None,
        }
    }
}

/// Plans the next status and due date for an advance request.
///
/// | current  | next     | due date        |
/// |----------|----------|-----------------|
/// | open     | sent     | today + 3 days  |
/// | sent     | waiting  | today + 7 days  |
/// | waiting  | followup | today           |
/// | followup | done     | unchanged       |
/// | done     | done     | unchanged       |
///
/// The match is exhaustive over `FollowupStatus`. Unknown stored text is
/// read back as `Open`, so no fallback row (max of today and due) exists.
pub fn plan_advance(followup: &Followup, today: NaiveDate) -> TransitionPlan {
    let current = followup.status;
    let status = next_status(current);
    let due_at = match current {
        FollowupStatus::Open => Some(add_days(today, SENT_WAIT_DAYS)),
        FollowupStatus::Sent => Some(add_days(today, WAITING_WAIT_DAYS)),
        FollowupStatus::Waiting => Some(today),
        FollowupStatus::Followup | FollowupStatus::Done => None,
    };
    TransitionPlan { status, due_at }
}

/// Pushes the due date out by `days`, counting from the stored date, or
/// from today when the stored date is unparseable.
pub fn plan_snooze(followup: &Followup, days: i64, today: NaiveDate) -> FollowupPatch {
    let base = parse_due_date(&followup.due_at).unwrap_or(today);
    FollowupPatch::due_at(format_date(add_days(base, days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: FollowupStatus, due_at: &str) -> Followup {
        Followup {
            id: "f_test".to_string(),
            workspace_id: "ws_1".to_string(),
            owner_id: "u_1".to_string(),
            contact_name: "Sarah Lim".to_string(),
            company_name: "Brightline Retail".to_string(),
            next_step: "Send pricing summary".to_string(),
            due_at: due_at.to_string(),
            status,
            created_at: "2026-01-01 08:00:00".to_string(),
        }
    }

    fn date(value: &str) -> NaiveDate {
        parse_due_date(value).expect("test date should parse")
    }

    #[test]
    fn advance_table() {
        let today = date("2026-01-01");
        let cases = [
            (FollowupStatus::Open, FollowupStatus::Sent, Some("2026-01-04")),
            (FollowupStatus::Sent, FollowupStatus::Waiting, Some("2026-01-08")),
            (FollowupStatus::Waiting, FollowupStatus::Followup, Some("2026-01-01")),
            (FollowupStatus::Followup, FollowupStatus::Done, None),
            (FollowupStatus::Done, FollowupStatus::Done, None),
        ];
        for (current, next, due) in cases {
            let plan = plan_advance(&record(current, "2025-06-01"), today);
            assert_eq!(plan.status, next, "current={current}");
            assert_eq!(plan.due_at, due.map(date), "current={current}");
        }
    }

    #[test]
    fn plan_converts_to_patch_without_next_step() {
        let patch = plan_advance(&record(FollowupStatus::Followup, "2026-01-01"), date("2026-01-05"))
            .into_patch();
        assert_eq!(patch.status, Some(FollowupStatus::Done));
        assert_eq!(patch.due_at, None);
        assert_eq!(patch.next_step, None);
    }

    #[test]
    fn snooze_counts_from_stored_date_or_today() {
        let today = date("2026-01-10");
        let past = plan_snooze(&record(FollowupStatus::Sent, "2026-01-01"), 3, today);
        assert_eq!(past.due_at.as_deref(), Some("2026-01-04"));

        let missing = plan_snooze(&record(FollowupStatus::Sent, ""), 7, today);
        assert_eq!(missing.due_at.as_deref(), Some("2026-01-17"));
        assert_eq!(missing.status, None);
    }
}
