use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult, ErrorResponse},
    handlers::{render, shell},
    models::{
        domain::CertificationDocument,
        dto::request::{ModeDefaults, QuizMode, StartQuizRequest, TimeLimit},
    },
};

#[derive(Parser, Debug)]
#[command(name = "exam-practice")]
#[command(about = "Practice certification exams in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory of certification JSON files (or a single file)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available certifications
    #[command(alias = "ls")]
    List,

    /// Start an interactive quiz
    Start {
        /// Certification id, as shown by `list`
        cert_id: String,

        #[arg(long, value_enum, default_value = "full")]
        mode: QuizMode,

        /// Number of questions in random mode (defaults to the recommendation)
        #[arg(long)]
        count: Option<usize>,

        /// Random-mode time limit such as 1h30m, 45m or 0 for none
        #[arg(long, value_name = "LIMIT", conflicts_with_all = ["hours", "minutes"])]
        time_limit: Option<String>,

        #[arg(long)]
        hours: Option<u32>,

        #[arg(long)]
        minutes: Option<u32>,

        /// Questions per page: 1, 5, 10, 20 or 50
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Score a JSON answer sheet against a whole certification
    Grade {
        cert_id: String,

        /// `{"<question id>": ["<option id>", ...]}`
        #[arg(long, value_name = "FILE")]
        answers: PathBuf,

        /// Print the report (or error) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON Schema of certification files
    Schema,
}

fn resolve_time_limit(
    text: Option<String>,
    hours: Option<u32>,
    minutes: Option<u32>,
    suggested: TimeLimit,
) -> AppResult<TimeLimit> {
    match (text, hours, minutes) {
        (Some(text), _, _) => TimeLimit::parse(&text),
        (None, None, None) => Ok(suggested),
        (None, hours, minutes) => {
            TimeLimit::from_parts(hours.unwrap_or_default(), minutes.unwrap_or_default())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InternalError(format!("cannot serialize output: {}", e)))
}

async fn grade(state: &AppState, cert_id: &str, answers: &Path, json: bool) -> AppResult<()> {
    let bank = state.certification_service.get_certification(cert_id).await?;
    let sheet = shell::read_answer_sheet(answers).await?;
    let report = shell::grade(&bank, &sheet, Utc::now())?;

    if json {
        println!("{}", to_json(&report)?);
    } else {
        println!("{}", render::summary(&report));
    }
    Ok(())
}

pub async fn run(cli: Cli, mut config: Config) -> AppResult<()> {
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    if let Commands::Schema = cli.command {
        let schema = schemars::schema_for!(CertificationDocument);
        println!("{}", to_json(&schema)?);
        return Ok(());
    }

    let state = AppState::new(config)?;

    match cli.command {
        Commands::List => {
            let certifications = state.certification_service.list().await?;
            println!("{}", render::certification_list(&certifications));
        }
        Commands::Start {
            cert_id,
            mode,
            count,
            time_limit,
            hours,
            minutes,
            page_size,
        } => {
            let bank = state.certification_service.get_certification(&cert_id).await?;
            let defaults = ModeDefaults::for_certification(&bank);
            println!("{}", render::mode_defaults(&bank.name, &defaults));

            let request = StartQuizRequest {
                certification_id: cert_id,
                mode,
                question_count: count,
                time_limit: resolve_time_limit(time_limit, hours, minutes, defaults.time_limit)?,
                page_size: page_size.unwrap_or(state.config.page_size),
            };
            shell::run_interactive(&state, request).await?;
        }
        Commands::Grade {
            cert_id,
            answers,
            json,
        } => {
            if let Err(err) = grade(&state, &cert_id, &answers, json).await {
                if json {
                    println!("{}", to_json(&ErrorResponse::from(&err))?);
                }
                return Err(err);
            }
        }
        Commands::Schema => {}
    }

    Ok(())
}
