mod ai;
mod api;
mod auth;
mod cli;
mod config;
mod db;
mod report;

use crate::ai::ChatCompletionClient;
use crate::cli::{AiCommands, Cli, Commands, ConfigCommands, MoodCommands, SessionCommands};
use crate::config::Config;
use crate::db::Database;
use crate::db::store::SqliteStore;
use crate::report::MoodRecord;
use crate::report::service::WeeklyReportService;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => handle_serve().await,
        Commands::Config { command } => handle_config_command(command),
        Commands::Mood { command } => handle_mood_command(command),
        Commands::Session { command } => handle_session_command(command),
        Commands::Report { user } => handle_report(user).await,
        Commands::Ai { command } => handle_ai_command(command).await,
    }
}

async fn handle_serve() -> Result<()> {
    let config = Config::load_or_default()?;
    let _ = Database::open(&config.db_path)?;

    let store = Arc::new(SqliteStore::new(config.db_path.clone()));
    let reports = build_report_service(&config, &store)?;

    api::run_server(&config, reports, store).await
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default()?;
            config.set_value(&key, &value)?;
            config.save()?;

            let masked = if key.contains("api_key") {
                "***hidden***".to_string()
            } else {
                value
            };
            println!("Config saved: {key} = {masked}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_or_default()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_mood_command(command: MoodCommands) -> Result<()> {
    match command {
        MoodCommands::Add {
            user,
            emoji,
            intensity,
            text,
            date,
        } => {
            let config = Config::load_or_default()?;
            let record = MoodRecord {
                record_date: parse_optional_date(date)?,
                mood_emoji: emoji.trim().to_string(),
                intensity,
                mood_text: text.filter(|value| !value.trim().is_empty()),
            };

            let id = Database::open(&config.db_path)?.insert_mood_record(user, &record)?;
            println!(
                "Mood recorded: #{id} {} {} ({}/10)",
                record.record_date, record.mood_emoji, record.intensity
            );
            Ok(())
        }
    }
}

fn handle_session_command(command: SessionCommands) -> Result<()> {
    match command {
        SessionCommands::Create { user } => {
            let config = Config::load_or_default()?;
            let session = auth::issue_session(&config, user)?;
            let expires_at = DateTime::from_timestamp(session.expires_at, 0)
                .map(|timestamp| timestamp.with_timezone(&Local).to_rfc3339())
                .unwrap_or_else(|| session.expires_at.to_string());

            println!("{}={}", auth::SESSION_COOKIE, session.token);
            println!("expires_at: {expires_at}");
            Ok(())
        }
    }
}

async fn handle_report(user: i64) -> Result<()> {
    let config = Config::load_or_default()?;
    let store = Arc::new(SqliteStore::new(config.db_path.clone()));
    let reports = build_report_service(&config, &store)?;

    let view = reports.get_or_create_latest_report(user).await?;
    let json = serde_json::to_string_pretty(&view).context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}

async fn handle_ai_command(command: AiCommands) -> Result<()> {
    match command {
        AiCommands::Test {
            key,
            base_url,
            model,
        } => {
            let mut config = Config::load_or_default()?;

            if let Some(value) = key {
                config.ai_api_key = Some(value);
            }
            if let Some(value) = base_url {
                config.ai_api_base_url = value;
            }
            if let Some(value) = model {
                config.ai_model = value;
            }

            let response = ai::test_connection(&config).await?;
            println!("AI API connection successful");
            println!("{response}");

            Ok(())
        }
    }
}

fn build_report_service(config: &Config, store: &Arc<SqliteStore>) -> Result<WeeklyReportService> {
    let generator = ChatCompletionClient::from_config(config)?;

    Ok(WeeklyReportService::new(
        store.clone(),
        store.clone(),
        Arc::new(generator),
        config.generation_timeout(),
    ))
}

fn parse_optional_date(input: Option<String>) -> Result<NaiveDate> {
    input
        .as_deref()
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date format: {date}. Example: 2026-02-18"))
        })
        .transpose()?
        .map_or_else(|| Ok(Local::now().date_naive()), Ok)
}
