use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use followthrough_core::view::{counters, first_overdue_id, visible};
use followthrough_core::{
    FollowupService, SortDir, SortKey, SqliteFollowupRepository, StatusFilter, ViewState,
};
use serde_json::json;

use super::Context;
use crate::output::format::{counters_line, followup_line, print_json, risk_line};
use crate::output::OutputFormat;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Due,
    Created,
    Company,
    Risk,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Due => SortKey::DueAt,
            SortArg::Created => SortKey::CreatedAt,
            SortArg::Company => SortKey::Company,
            SortArg::Risk => SortKey::Risk,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// `all` or one status
    #[arg(long, default_value = "all", value_parser = parse_filter)]
    pub status: StatusFilter,
    /// Case-insensitive match on contact, company and next step
    #[arg(long, default_value = "")]
    pub query: String,
    #[arg(long, value_enum, default_value = "due")]
    pub sort: SortArg,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Skip auto-escalation of overdue sent/waiting follow-ups
    #[arg(long)]
    pub no_refresh: bool,
}

fn parse_filter(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value)
        .ok_or_else(|| format!("`{value}` is not one of all|open|sent|waiting|followup|done"))
}

pub fn run(args: &ListArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let (items, escalated) = if args.no_refresh {
        (service.list(&auth.workspace_id, None)?, Vec::new())
    } else {
        let outcome = service
            .refresh(&auth.workspace_id, ctx.today)
            .context("Failed to refresh follow-ups")?;
        (outcome.items, outcome.escalated)
    };

    let state = ViewState {
        query: args.query.clone(),
        status_filter: args.status,
        sort_by: args.sort.into(),
        sort_dir: if args.desc { SortDir::Desc } else { SortDir::Asc },
    };
    let shown = visible(&items, &state, ctx.today);
    let totals = counters(&items, ctx.today);
    let first_overdue = first_overdue_id(&shown, ctx.today);

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "counters": totals,
            "firstOverdueId": first_overdue,
            "escalated": escalated,
            "items": shown,
        })),
        OutputFormat::Text => {
            println!("{}", counters_line(totals));
            if !escalated.is_empty() {
                println!("Escalated to follow-up: {}", escalated.join(", "));
            }
            if shown.is_empty() {
                println!("No follow-ups found.");
            }
            for item in shown {
                let marker = if Some(item.id.as_str()) == first_overdue { ">" } else { " " };
                println!("{marker} {}", followup_line(item, ctx.today));
            }
            Ok(())
        }
    }
}

pub fn refresh(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let outcome = service
        .refresh(&auth.workspace_id, ctx.today)
        .context("Failed to refresh follow-ups")?;
    match ctx.format {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Text => {
            println!(
                "Escalated {} of {} follow-up(s).",
                outcome.escalated.len(),
                outcome.items.len()
            );
            for id in &outcome.escalated {
                println!("  {id}");
            }
            Ok(())
        }
    }
}

pub fn risk(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let mut assessed = service.assess(&auth.workspace_id, ctx.today)?;
    assessed.sort_by(|a, b| b.risk.score.cmp(&a.risk.score));
    match ctx.format {
        OutputFormat::Json => print_json(&assessed),
        OutputFormat::Text => {
            if assessed.is_empty() {
                println!("No follow-ups found.");
            }
            for entry in &assessed {
                println!("{}", risk_line(entry));
            }
            Ok(())
        }
    }
}
