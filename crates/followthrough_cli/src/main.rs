use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Parser;
use followthrough_core::{default_log_level, init_logging, LogConfig};
use std::path::PathBuf;

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "followthrough",
    version,
    about = "Track follow-ups from first contact to done"
)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "FOLLOWTHROUGH_DB_PATH")]
    db: Option<PathBuf>,

    /// API key scoping every follow-up command to one workspace
    #[arg(long, global = true, env = "FOLLOWTHROUGH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Write rolling logs into this absolute directory
    #[arg(long, global = true, env = "FOLLOWTHROUGH_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "FOLLOWTHROUGH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: commands::Commands,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("`{value}` is not a YYYY-MM-DD date"))
}

fn init_file_logging(cli: &Cli) -> Result<()> {
    let Some(log_dir) = cli.log_dir.as_ref() else {
        return Ok(());
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let config = LogConfig::new(level, log_dir).context("Invalid logging options")?;
    init_logging(&config).context("Failed to start logging")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_file_logging(&cli)?;

    let ctx = commands::Context::new(cli.db.clone(), cli.api_key.clone(), cli.today, cli.format);

    match &cli.command {
        commands::Commands::Key(args) => commands::key::run(args, &ctx),
        commands::Commands::Add(args) => commands::followup::add(args, &ctx),
        commands::Commands::List(args) => commands::list::run(args, &ctx),
        commands::Commands::Show(args) => commands::followup::show(args, &ctx),
        commands::Commands::Advance(args) => commands::followup::advance(args, &ctx),
        commands::Commands::Snooze(args) => commands::followup::snooze(args, &ctx),
        commands::Commands::Done(args) => commands::followup::done(args, &ctx),
        commands::Commands::Reopen(args) => commands::followup::reopen(args, &ctx),
        commands::Commands::Edit(args) => commands::followup::edit(args, &ctx),
        commands::Commands::Refresh => commands::list::refresh(&ctx),
        commands::Commands::Risk => commands::list::risk(&ctx),
        commands::Commands::Seed(args) => commands::seed::run(args, &ctx),
        commands::Commands::Request(args) => commands::request::run(args, &ctx),
        commands::Commands::Ping => commands::ping(&ctx),
    }
}
