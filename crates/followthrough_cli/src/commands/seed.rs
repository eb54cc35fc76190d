use anyhow::{Context as _, Result};
use clap::Args;
use followthrough_core::{
    seed_demo, FollowupService, SqliteFollowupRepository, SqliteWorkspaceRepository,
    DEMO_OWNER_ID, DEMO_WORKSPACE_ID,
};

use super::Context;
use crate::output::format::print_json;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct SeedArgs {
    #[arg(long, default_value = DEMO_WORKSPACE_ID)]
    pub workspace: String,
    #[arg(long, default_value = DEMO_OWNER_ID)]
    pub owner: String,
}

pub fn run(args: &SeedArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let workspaces = SqliteWorkspaceRepository::new(&conn);
    let service = FollowupService::new(SqliteFollowupRepository::new(&conn));

    let outcome = seed_demo(&workspaces, &service, &args.workspace, &args.owner, ctx.today)
        .context("Failed to seed demo data")?;
    match ctx.format {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Text => {
            println!(
                "Seeded {} follow-up(s) into {}.",
                outcome.inserted.len(),
                args.workspace
            );
            Ok(())
        }
    }
}
