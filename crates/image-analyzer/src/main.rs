//! Operator CLI for the analyzer's local store.

use analyzer_database::{history, user};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use image_analyzer::{AnalyzerConfig, HistoryRepository};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "image-analyzer")]
#[command(about = "Inspect and prune the image analyzer's local history and profiles")]
struct Args {
    /// SQLite URL. Falls back to ANALYZER_DATABASE_URL env.
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prompt/response history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Locally stored user profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// List entries, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete one entry by ID
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Print the profile stored for a uid
    Show { uid: String },
    /// Delete the profile stored for a uid
    Delete { uid: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AnalyzerConfig::from_env();
    if let Some(url) = args.database_url {
        config = config.with_database_url(url);
    }
    let db = config.open_database().await?;

    match args.command {
        Command::History { action } => match action {
            HistoryAction::List { limit } => {
                let rows = history::list_history(db.pool()).await?;
                let shown = limit.unwrap_or(rows.len());
                for row in rows.iter().take(shown) {
                    println!(
                        "#{} [{}] {}\n    {}",
                        row.id,
                        format_timestamp(row.timestamp),
                        row.prompt,
                        row.response.replace('\n', "\n    ")
                    );
                }
                info!("{} of {} entries shown", shown.min(rows.len()), rows.len());
            }
            HistoryAction::Delete { id } => {
                HistoryRepository::new(db.clone()).delete_history(id).await?;
                println!("Deleted history entry {id} (if it existed)");
            }
        },
        Command::Profile { action } => match action {
            ProfileAction::Show { uid } => match user::get_user(db.pool(), &uid).await? {
                Some(profile) => {
                    println!("uid:     {}", profile.uid);
                    println!("name:    {} {}", profile.first_name, profile.last_name);
                    println!("email:   {}", profile.email);
                    println!("phone:   {}", profile.phone_number);
                    println!("address: {}", profile.address);
                }
                None => println!("No profile stored for {uid}"),
            },
            ProfileAction::Delete { uid } => match user::get_user(db.pool(), &uid).await? {
                Some(profile) => {
                    user::delete_user(db.pool(), &profile).await?;
                    println!("Deleted profile {uid}");
                }
                None => println!("No profile stored for {uid}"),
            },
        },
    }

    db.close().await;
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}
