//! Follow-up lifecycle engine.
//!
//! # Responsibility
//! - Own the status progression, due-date classification, auto-escalation
//!   rule and advisory risk score.
//! - Serve both the handler layer and the CLI so that neither re-derives
//!   these rules.
//!
//! # Invariants
//! - Every function is pure over `(record, today)`; no clock reads, no I/O.
//! - Planning functions return patches and never mutate their input.
//! - Total over all five statuses; malformed dates degrade to "no date".

mod advance;
mod due;
mod escalate;
mod risk;
mod status;

pub use advance::{plan_advance, plan_snooze, TransitionPlan};
pub use due::{
    add_days, classify_due, days_from_today, format_date, is_due_today, is_overdue,
    is_overdue_open, needs_attention_today, parse_due_date, DueBadge, DueKind,
};
pub use escalate::auto_escalate;
pub use risk::{risk, RiskAssessment, RiskLevel};
pub use status::{is_terminal, next_status, STATUS_ORDER};
