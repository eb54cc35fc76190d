use anyhow::Result;
use chrono::NaiveDate;
use followthrough_core::lifecycle::{classify_due, risk};
use followthrough_core::{AssessedFollowup, Counters, Followup};
use serde::Serialize;

use super::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary: `id  status  badge  contact @ company: next step`.
pub fn followup_line(item: &Followup, today: NaiveDate) -> String {
    let badge = classify_due(&item.due_at, today);
    format!(
        "{}  {:<9}  {:<14}  {} @ {}: {}",
        item.id,
        item.status.label(),
        badge.label,
        item.contact_name,
        item.company_name,
        item.next_step
    )
}

pub fn followup_detail(item: &Followup, today: NaiveDate) -> String {
    let badge = classify_due(&item.due_at, today);
    let assessment = risk(item, today);
    let mut out = String::new();
    out.push_str(&format!("Follow-up: {}\n", item.id));
    out.push_str(&format!("Contact:   {}\n", item.contact_name));
    out.push_str(&format!("Company:   {}\n", item.company_name));
    out.push_str(&format!("Next step: {}\n", item.next_step));
    out.push_str(&format!("Status:    {}\n", item.status.label()));
    out.push_str(&format!("Due:       {} ({})\n", item.due_at, badge.label));
    out.push_str(&format!(
        "Risk:      {} ({})\n",
        assessment.score,
        assessment.level.as_str()
    ));
    for reason in &assessment.reasons {
        out.push_str(&format!("           - {reason}\n"));
    }
    out.push_str(&format!("Suggest:   {}\n", assessment.suggestion));
    out.push_str(&format!("Created:   {}", item.created_at));
    out
}

pub fn print_followup(item: &Followup, today: NaiveDate, fmt: OutputFormat) -> Result<()> {
    match fmt {
        OutputFormat::Json => print_json(item),
        OutputFormat::Text => {
            println!("{}", followup_detail(item, today));
            Ok(())
        }
    }
}

pub fn counters_line(counters: Counters) -> String {
    format!(
        "Needs follow-up today: {} | Overdue: {}",
        counters.needs_today, counters.overdue
    )
}

pub fn risk_line(entry: &AssessedFollowup) -> String {
    format!(
        "{:>3} {:<6}  {}  {} @ {} | {}",
        entry.risk.score,
        entry.risk.level.as_str(),
        entry.item.id,
        entry.item.contact_name,
        entry.item.company_name,
        entry.risk.suggestion
    )
}
