use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "moodweek",
    about = "Weekly emotional-wellbeing reports from mood records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API until Ctrl+C
    Serve,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Mood {
        #[command(subcommand)]
        command: MoodCommands,
    },
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Print this week's report for a user, generating it when missing
    Report {
        #[arg(long)]
        user: i64,
    },
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}

#[derive(Debug, Subcommand)]
pub enum MoodCommands {
    Add {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        emoji: String,
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=10))]
        intensity: i64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommands {
    Create {
        #[arg(long)]
        user: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AiCommands {
    Test {
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}
