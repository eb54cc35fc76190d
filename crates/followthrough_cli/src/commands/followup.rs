use anyhow::{bail, Context as _, Result};
use clap::Args;
use followthrough_core::{
    FollowupPatch, FollowupService, FollowupStatus, NewFollowup, SqliteFollowupRepository,
};

use super::Context;
use crate::output::format::print_followup;

#[derive(Args)]
pub struct IdArgs {
    /// Follow-up id (`f_...`)
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub company: String,
    /// Next step to take
    #[arg(long = "next")]
    pub next_step: String,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: String,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<FollowupStatus>,
}

#[derive(Args)]
pub struct SnoozeArgs {
    pub id: String,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..=365))]
    pub days: i64,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long = "next")]
    pub next_step: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<FollowupStatus>,
}

pub fn parse_status(value: &str) -> Result<FollowupStatus, String> {
    FollowupStatus::parse(value)
        .ok_or_else(|| format!("`{value}` is not one of open|sent|waiting|followup|done"))
}

pub fn add(args: &AddArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let created = service
        .create(
            &auth.workspace_id,
            &auth.owner_id,
            NewFollowup {
                contact_name: args.contact.clone(),
                company_name: args.company.clone(),
                next_step: args.next_step.clone(),
                due_at: args.due.clone(),
                status: args.status,
            },
        )
        .context("Failed to add follow-up")?;
    print_followup(&created, ctx.today, ctx.format)
}

pub fn show(args: &IdArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let Some(item) = service.get(&auth.workspace_id, &args.id)? else {
        bail!("Follow-up `{}` not found", args.id);
    };
    print_followup(&item, ctx.today, ctx.format)
}

pub fn advance(args: &IdArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let updated = service
        .advance(&auth.workspace_id, &args.id, ctx.today)
        .with_context(|| format!("Failed to advance `{}`", args.id))?;
    print_followup(&updated, ctx.today, ctx.format)
}

pub fn snooze(args: &SnoozeArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let updated = service
        .snooze(&auth.workspace_id, &args.id, args.days, ctx.today)
        .with_context(|| format!("Failed to snooze `{}`", args.id))?;
    print_followup(&updated, ctx.today, ctx.format)
}

pub fn done(args: &IdArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let updated = service
        .mark_done(&auth.workspace_id, &args.id)
        .with_context(|| format!("Failed to mark `{}` done", args.id))?;
    print_followup(&updated, ctx.today, ctx.format)
}

pub fn reopen(args: &IdArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let updated = service
        .reopen(&auth.workspace_id, &args.id)
        .with_context(|| format!("Failed to reopen `{}`", args.id))?;
    print_followup(&updated, ctx.today, ctx.format)
}

pub fn edit(args: &EditArgs, ctx: &Context) -> Result<()> {
    let patch = FollowupPatch {
        status: args.status,
        due_at: args.due.clone(),
        next_step: args.next_step.clone(),
    };
    if patch.is_empty() {
        bail!("Nothing to edit; pass --next, --due or --status");
    }

    let conn = ctx.open()?;
    let auth = ctx.authenticate(&conn)?;
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let updated = service
        .patch(&auth.workspace_id, &args.id, &patch)
        .with_context(|| format!("Failed to edit `{}`", args.id))?;
    print_followup(&updated, ctx.today, ctx.format)
}
