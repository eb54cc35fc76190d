pub mod followup;
pub mod key;
pub mod list;
pub mod request;
pub mod seed;

use anyhow::{bail, Context as _, Result};
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use followthrough_core::db::open_db;
use followthrough_core::{core_version, ping as core_ping, AuthContext, AuthService, SqliteApiKeyRepository};
use rusqlite::Connection;
use std::path::PathBuf;

use crate::output::OutputFormat;

const DEFAULT_DB_FILE_NAME: &str = "followthrough.sqlite3";

#[derive(Subcommand)]
pub enum Commands {
    /// Issue or revoke API keys
    Key(key::KeyArgs),
    /// Capture a new follow-up
    Add(followup::AddArgs),
    /// List follow-ups with filters, sorting and attention counters
    List(list::ListArgs),
    /// Show one follow-up with its due badge and risk
    Show(followup::IdArgs),
    /// Move a follow-up one step forward
    Advance(followup::IdArgs),
    /// Push the due date out by some days
    Snooze(followup::SnoozeArgs),
    /// Mark a follow-up done
    Done(followup::IdArgs),
    /// Reopen a follow-up
    Reopen(followup::IdArgs),
    /// Change next step, due date or status
    Edit(followup::EditArgs),
    /// Escalate overdue sent/waiting follow-ups
    Refresh,
    /// Rank follow-ups by risk
    Risk,
    /// Insert a demo workspace with sample follow-ups
    Seed(seed::SeedArgs),
    /// Dispatch one request through the API handlers
    Request(request::RequestArgs),
    /// Print core health and version
    Ping,
}

/// Options shared by every subcommand.
pub struct Context {
    db_path: PathBuf,
    api_key: Option<String>,
    pub today: NaiveDate,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(
        db_path: Option<PathBuf>,
        api_key: Option<String>,
        today: Option<NaiveDate>,
        format: OutputFormat,
    ) -> Self {
        Self {
            db_path: db_path
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            today: today.unwrap_or_else(|| Local::now().date_naive()),
            format,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn open(&self) -> Result<Connection> {
        open_db(&self.db_path)
            .with_context(|| format!("Failed to open database `{}`", self.db_path.display()))
    }

    /// Resolves `--api-key` to its workspace.
    pub fn authenticate(&self, conn: &Connection) -> Result<AuthContext> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!(
                "No API key. Pass --api-key or set FOLLOWTHROUGH_API_KEY \
                 (issue one with `followthrough key issue`)."
            );
        };
        AuthService::new(SqliteApiKeyRepository::new(conn))
            .authenticate_key(api_key)
            .context("API key rejected")
    }
}

pub fn ping(ctx: &Context) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => crate::output::format::print_json(&serde_json::json!({
            "ping": core_ping(),
            "version": core_version(),
        })),
        OutputFormat::Text => {
            println!("followthrough_core ping={}", core_ping());
            println!("followthrough_core version={}", core_version());
            Ok(())
        }
    }
}
