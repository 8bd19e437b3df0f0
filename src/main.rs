use std::io;
use std::path::PathBuf;

use anyhow::Context;
use ca_prep::config::{Config, GlobalOptions};
use ca_prep::database::db;
use ca_prep::export::json::{export_reviews_to_path, import_reviews};
use ca_prep::models::{AnswerBatch, AnsweredQuestion, DueQuery, Question, RemovalReport};
use ca_prep::reminders::build_reminders;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Spaced-repetition review scheduling for CA exam preparation
#[derive(Parser)]
#[command(name = "ca-prep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or update a question in the bank
    AddQuestion {
        id: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// Record a single answer
    Answer {
        #[arg(long)]
        user: String,
        #[arg(long)]
        question: String,
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,
        #[arg(long)]
        incorrect: bool,
    },

    /// Record a batch of answers from a JSON file ([{questionId, isCorrect}, ...])
    Submit {
        #[arg(long)]
        user: String,
        file: PathBuf,
    },

    /// List reviews that are due
    Due {
        #[arg(long)]
        user: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show stage distribution and due count for a user
    Summary {
        #[arg(long)]
        user: String,
    },

    /// Build reminder digests for users with due reviews
    Reminders {
        #[arg(long, default_value = "1")]
        min_due: u32,
    },

    /// Export a user's review states to JSON
    Export {
        #[arg(long)]
        user: String,
        output: PathBuf,
    },

    /// Import review states from an export file
    Import { file: PathBuf },

    /// Remove all review data of a user
    ForgetUser {
        #[arg(long)]
        user: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = Config::resolve(&cli.options);
    let mut conn = db::init_database(&config.database_path).with_context(|| {
        format!("failed to open database {}", config.database_path.display())
    })?;

    match cli.command {
        Commands::AddQuestion {
            id,
            subject,
            prompt,
        } => {
            db::add_question(&Question { id, subject, prompt }, &conn)?;
        }
        Commands::Answer {
            user,
            question,
            correct,
            incorrect: _,
        } => {
            let batch = AnswerBatch::new(
                user,
                vec![AnsweredQuestion {
                    question_id: question,
                    is_correct: correct,
                }],
            );
            let updated = db::record_answers(&batch, config.now, &mut conn)?;
            print_json(&updated)?;
        }
        Commands::Submit { user, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let answers: Vec<AnsweredQuestion> = serde_json::from_str(&text)
                .with_context(|| format!("invalid answer list in {}", file.display()))?;
            let updated = db::record_answers(&AnswerBatch::new(user, answers), config.now, &mut conn)?;
            print_json(&updated)?;
        }
        Commands::Due {
            user,
            subject,
            limit,
        } => {
            let due = db::get_due_reviews(&user, &DueQuery { subject, limit }, config.now, &conn)?;
            print_json(&due)?;
        }
        Commands::Summary { user } => {
            print_json(&db::review_summary(&user, config.now, &conn)?)?;
        }
        Commands::Reminders { min_due } => {
            print_json(&build_reminders(config.now, min_due, &conn)?)?;
        }
        Commands::Export { user, output } => {
            let count = export_reviews_to_path(&user, config.now, &output, &conn)
                .with_context(|| format!("failed to export to {}", output.display()))?;
            info!(user_id = %user, reviews = count, "Export written");
        }
        Commands::Import { file } => {
            let count = import_reviews(&file, &mut conn)
                .with_context(|| format!("failed to import {}", file.display()))?;
            info!(reviews = count, "Import finished");
        }
        Commands::ForgetUser { user } => {
            let deleted = db::delete_user_reviews(&user, &conn)?;
            print_json(&RemovalReport {
                user_id: user,
                deleted,
            })?;
        }
    }

    Ok(())
}
