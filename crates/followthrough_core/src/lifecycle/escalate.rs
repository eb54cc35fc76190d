//! Auto-escalation of stale `sent`/`waiting` follow-ups.

use super::due::is_overdue;
use crate::model::followup::{Followup, FollowupPatch, FollowupStatus};
use chrono::NaiveDate;

/// Returns `{status: followup}` when a `sent` or `waiting` record is
/// strictly past its due date, and `None` otherwise.
///
/// Idempotent: an escalated record is no longer `sent`/`waiting`.
pub fn auto_escalate(followup: &Followup, today: NaiveDate) -> Option<FollowupPatch> {
    let escalatable = matches!(
        followup.status,
        FollowupStatus::Sent | FollowupStatus::Waiting
    );
    if escalatable && is_overdue(&followup.due_at, today) {
        return Some(FollowupPatch::status(FollowupStatus::Followup));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::due::parse_due_date;

    fn record(status: FollowupStatus, due_at: &str) -> Followup {
        Followup {
            id: "f_esc".to_string(),
            workspace_id: "ws_1".to_string(),
            owner_id: "u_1".to_string(),
            contact_name: "Miguel Ortiz".to_string(),
            company_name: "AltoSoft".to_string(),
            next_step: "Schedule demo".to_string(),
            due_at: due_at.to_string(),
            status,
            created_at: "2026-01-01 08:00:00".to_string(),
        }
    }

    #[test]
    fn only_overdue_sent_and_waiting_escalate() {
        let today = parse_due_date("2026-01-10").unwrap();
        let yesterday = "2026-01-09";

        for status in [FollowupStatus::Sent, FollowupStatus::Waiting] {
            assert_eq!(
                auto_escalate(&record(status, yesterday), today),
                Some(FollowupPatch::status(FollowupStatus::Followup))
            );
        }
        for status in [
            FollowupStatus::Open,
            FollowupStatus::Followup,
            FollowupStatus::Done,
        ] {
            assert_eq!(auto_escalate(&record(status, yesterday), today), None);
        }
    }

    #[test]
    fn due_today_and_unparseable_dates_do_not_escalate() {
        let today = parse_due_date("2026-01-10").unwrap();
        assert_eq!(auto_escalate(&record(FollowupStatus::Sent, "2026-01-10"), today), None);
        assert_eq!(auto_escalate(&record(FollowupStatus::Waiting, "n/a"), today), None);
    }

    #[test]
    fn second_application_is_a_no_op() {
        let today = parse_due_date("2026-01-10").unwrap();
        let mut followup = record(FollowupStatus::Waiting, "2026-01-01");

        let patch = auto_escalate(&followup, today).expect("first pass escalates");
        patch.apply_to(&mut followup);

        assert_eq!(followup.status, FollowupStatus::Followup);
        assert_eq!(auto_escalate(&followup, today), None);
    }
}
