use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use followthrough_core::{AuthService, SqliteApiKeyRepository, DEMO_OWNER_ID, DEMO_WORKSPACE_ID};
use log::info;

use super::Context;
use crate::output::format::print_json;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyAction,
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Issue a new key; the plaintext is printed once
    Issue {
        #[arg(long, default_value = DEMO_WORKSPACE_ID)]
        workspace: String,
        #[arg(long, default_value = DEMO_OWNER_ID)]
        owner: String,
        #[arg(long, default_value = "cli")]
        label: String,
    },
    /// Revoke a key by id (`k_...`)
    Revoke { id: String },
}

pub fn run(args: &KeyArgs, ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let auth = AuthService::new(SqliteApiKeyRepository::new(&conn));

    match &args.action {
        KeyAction::Issue {
            workspace,
            owner,
            label,
        } => {
            let issued = auth
                .issue_key(workspace, owner, label)
                .context("Failed to issue API key")?;
            info!("event=cli_key_issue module=cli status=ok key_id={}", issued.id);
            match ctx.format {
                OutputFormat::Json => print_json(&issued)?,
                OutputFormat::Text => {
                    println!("Issued {} for {}/{}", issued.id, issued.workspace_id, issued.owner_id);
                    println!("{}", issued.api_key);
                }
            }
        }
        KeyAction::Revoke { id } => {
            auth.revoke_key(id)
                .with_context(|| format!("Failed to revoke `{id}`"))?;
            match ctx.format {
                OutputFormat::Json => print_json(&serde_json::json!({ "ok": true, "id": id }))?,
                OutputFormat::Text => println!("Revoked {id}"),
            }
        }
    }
    Ok(())
}
