use chrono::NaiveDate;
use followthrough_core::lifecycle::{
    auto_escalate, classify_due, next_status, plan_advance, risk, DueKind, RiskLevel,
    STATUS_ORDER,
};
use followthrough_core::{Followup, FollowupPatch, FollowupStatus};
use proptest::prelude::*;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn followup(status: FollowupStatus, due_at: &str) -> Followup {
    Followup {
        id: "f_test".to_string(),
        workspace_id: "w_demo".to_string(),
        owner_id: "u_demo".to_string(),
        contact_name: "Sarah Lim".to_string(),
        company_name: "Brightline Retail".to_string(),
        next_step: "Send pricing summary".to_string(),
        due_at: due_at.to_string(),
        status,
        created_at: "2026-01-01 09:00:00".to_string(),
    }
}

fn status_strategy() -> impl Strategy<Value = FollowupStatus> {
    proptest::sample::select(STATUS_ORDER.to_vec())
}

#[test]
fn five_next_status_steps_always_reach_done() {
    for &start in STATUS_ORDER {
        let mut status = start;
        for _ in 0..5 {
            status = next_status(status);
        }
        assert_eq!(status, FollowupStatus::Done, "start={start}");
    }
}

#[test]
fn classify_due_reference_cases() {
    let today = day("2026-01-10");

    let badge = classify_due("2026-01-10", today);
    assert_eq!(badge.kind, DueKind::Soon);
    assert_eq!(badge.label, "Due today");

    let badge = classify_due("2026-01-05", today);
    assert_eq!(badge.kind, DueKind::Overdue);
    assert_eq!(badge.label, "Overdue (5d)");

    let badge = classify_due("2026-01-20", today);
    assert_eq!(badge.kind, DueKind::Due);
    assert_eq!(badge.label, "Due in 10d");
}

#[test]
fn classify_due_ignores_time_of_day() {
    let badge = classify_due("2026-01-11T23:59:00.000Z", day("2026-01-10"));
    assert_eq!(badge.label, "Due tomorrow");
}

#[test]
fn waiting_fourteen_days_overdue_is_high_risk() {
    let assessment = risk(
        &followup(FollowupStatus::Waiting, "2026-01-01"),
        day("2026-01-15"),
    );
    assert_eq!(assessment.score, 90);
    assert_eq!(assessment.level, RiskLevel::High);
    assert_eq!(
        assessment.suggestion,
        "Follow up today: short check-in + 2 options."
    );
    assert_eq!(
        assessment.reasons,
        vec!["Overdue 14 day(s)".to_string(), "Status: waiting".to_string()]
    );
}

#[test]
fn done_is_never_risky() {
    for today in ["2020-01-02", "2026-06-01", "2031-12-31"] {
        let assessment = risk(&followup(FollowupStatus::Done, "2020-01-01"), day(today));
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.reasons.is_empty());
        assert_eq!(assessment.suggestion, "No action needed.");
    }
}

#[test]
fn escalation_reference_cases() {
    let today = day("2026-01-10");
    assert_eq!(
        auto_escalate(&followup(FollowupStatus::Sent, "2026-01-09"), today),
        Some(FollowupPatch::status(FollowupStatus::Followup))
    );
    assert_eq!(
        auto_escalate(&followup(FollowupStatus::Open, "2026-01-09"), today),
        None
    );
}

#[test]
fn advance_from_open_schedules_three_days_out() {
    let plan = plan_advance(
        &followup(FollowupStatus::Open, "1999-12-31"),
        day("2026-01-01"),
    );
    assert_eq!(plan.status, FollowupStatus::Sent);
    assert_eq!(plan.due_at, Some(day("2026-01-04")));
}

proptest! {
    #[test]
    fn escalation_is_idempotent(
        status in status_strategy(),
        offset in -60i64..60,
    ) {
        let today = day("2026-03-15");
        let due = followthrough_core::lifecycle::format_date(
            followthrough_core::lifecycle::add_days(today, offset),
        );
        let mut record = followup(status, &due);
        if let Some(patch) = auto_escalate(&record, today) {
            patch.apply_to(&mut record);
            prop_assert_eq!(record.status, FollowupStatus::Followup);
        }
        prop_assert_eq!(auto_escalate(&record, today), None);
    }

    #[test]
    fn risk_score_stays_in_range_and_matches_level(
        status in status_strategy(),
        offset in -400i64..400,
    ) {
        let today = day("2026-03-15");
        let due = followthrough_core::lifecycle::format_date(
            followthrough_core::lifecycle::add_days(today, offset),
        );
        let assessment = risk(&followup(status, &due), today);
        prop_assert!(assessment.score <= 100);
        prop_assert!(assessment.reasons.len() <= 3);
        let expected = if assessment.score >= 60 {
            RiskLevel::High
        } else if assessment.score >= 25 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        prop_assert_eq!(assessment.level, expected);
    }

    #[test]
    fn classification_is_pure(offset in -30i64..30) {
        let today = day("2026-03-15");
        let due = followthrough_core::lifecycle::format_date(
            followthrough_core::lifecycle::add_days(today, offset),
        );
        prop_assert_eq!(classify_due(&due, today), classify_due(&due, today));
    }
}
