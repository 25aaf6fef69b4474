use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    handlers::{
        commands::{parse_command, to_action, ShellCommand, HELP},
        render,
    },
    models::{
        domain::{Certification, SessionMode},
        dto::{
            request::{AnswerSheet, SessionOptions, StartQuizRequest},
            response::SummaryReport,
        },
    },
    services::{
        pagination::PageSize,
        quiz_runtime::{Action, Outcome, QuizRuntime, RunPhase},
        session_timer::TimerTick,
    },
};

/// What the prompt loop should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Show(String),
    Quit,
}

/// One interactive quiz: the current runtime plus what is needed to restart it.
pub struct ShellSession {
    bank: Certification,
    options: SessionOptions,
    runtime: QuizRuntime,
    last_tick: TimerTick,
    rng: StdRng,
}

impl ShellSession {
    pub fn start(
        bank: Certification,
        options: SessionOptions,
        now: DateTime<Utc>,
        mut rng: StdRng,
    ) -> AppResult<Self> {
        let runtime = QuizRuntime::start(&bank, options, now, &mut rng)?;
        let last_tick = runtime.clock();
        Ok(Self {
            bank,
            options,
            runtime,
            last_tick,
            rng,
        })
    }

    pub fn runtime(&self) -> &QuizRuntime {
        &self.runtime
    }

    pub fn render_page(&self) -> String {
        render::page(&self.runtime.page_view(), Some(&self.last_tick))
    }

    /// Delivers a clock tick. Returns a notice when something worth printing
    /// happened: the warning threshold was crossed or the limit ran out.
    pub fn tick(&mut self, now: DateTime<Utc>) -> AppResult<Option<String>> {
        let Outcome::Clock(tick) = self.runtime.dispatch(Action::Tick { now })? else {
            return Ok(None);
        };

        let notice = if tick.expired_now {
            Some(format!(
                "Time is up! Keep going or type `done` to see your results. ({})",
                render::timer_line(&tick)
            ))
        } else if tick.warning && !self.last_tick.warning {
            Some(format!("Hurry up: {}", render::timer_line(&tick)))
        } else {
            None
        };

        self.last_tick = tick;
        Ok(notice)
    }

    fn restart(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        let runtime = QuizRuntime::start(&self.bank, self.options, now, &mut self.rng)?;
        log::info!(
            "Quiz run {} replaced by {}",
            self.runtime.id(),
            runtime.id()
        );
        self.runtime = runtime;
        self.last_tick = self.runtime.clock();
        Ok(())
    }

    /// Handles one prompt line. User mistakes come back as `Err` and leave the
    /// quiz untouched.
    pub fn handle_line(&mut self, line: &str, now: DateTime<Utc>) -> AppResult<Reply> {
        let Some(command) = parse_command(line)? else {
            return Ok(Reply::Show(String::new()));
        };

        match command {
            ShellCommand::Quit => return Ok(Reply::Quit),
            ShellCommand::Help => return Ok(Reply::Show(HELP.to_string())),
            ShellCommand::Timer => {
                self.tick(now)?;
                return Ok(Reply::Show(render::timer_line(&self.last_tick)));
            }
            ShellCommand::Restart => {
                self.restart(now)?;
                return Ok(Reply::Show(self.render_page()));
            }
            _ => {}
        }

        let Some(action) = to_action(&command, self.runtime.session(), now)? else {
            return Ok(Reply::Show(String::new()));
        };

        let text = match self.runtime.dispatch(action)? {
            Outcome::PageScored(report) => {
                format!("{}\n\n{}", self.render_page(), render::page_report(&report))
            }
            Outcome::Summary(report) => {
                self.last_tick = self.runtime.clock();
                render::summary(&report)
            }
            Outcome::Detail(detail) => render::question_detail(&detail),
            Outcome::Clock(tick) => render::timer_line(&tick),
            Outcome::Updated => match self.runtime.phase() {
                RunPhase::InProgress => self.render_page(),
                RunPhase::Summary => render::summary(&self.runtime.summary_report()),
            },
        };

        Ok(Reply::Show(text))
    }
}

fn is_recoverable(err: &AppError) -> bool {
    matches!(
        err,
        AppError::NotFound(_) | AppError::InvalidParameter(_) | AppError::InvalidState(_)
    )
}

/// Runs an interactive quiz on stdin/stdout until `q` or end of input.
pub async fn run_interactive(state: &AppState, request: StartQuizRequest) -> AppResult<()> {
    let (bank, options) = state.certification_service.prepare(request).await?;
    let mut session = ShellSession::start(bank, options, Utc::now(), StdRng::from_entropy())?;

    println!("{}", session.render_page());
    println!("(type h for help)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(state.config.tick_millis));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(notice) = session.tick(Utc::now())? {
                    println!("{}", notice);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    log::debug!("stdin closed, leaving quiz");
                    break;
                };

                match session.handle_line(&line, Utc::now()) {
                    Ok(Reply::Quit) => break,
                    Ok(Reply::Show(text)) if text.is_empty() => {}
                    Ok(Reply::Show(text)) => println!("{}", text),
                    Err(err) if is_recoverable(&err) => {
                        log::debug!("Rejected command '{}': {}", line.trim(), err);
                        println!("! {}", err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }

    log::info!("Quiz run {} closed", session.runtime().id());
    Ok(())
}

/// Scores a prepared answer sheet against the full bank in question order.
pub fn grade(
    bank: &Certification,
    sheet: &AnswerSheet,
    now: DateTime<Utc>,
) -> AppResult<SummaryReport> {
    let options = SessionOptions {
        mode: SessionMode::Full,
        time_limit_seconds: None,
        page_size: PageSize::default(),
    };
    let mut runtime = QuizRuntime::start(bank, options, now, &mut rand::thread_rng())?;

    let mut entries: Vec<_> = sheet.0.iter().collect();
    entries.sort();
    for (question_id, option_ids) in entries {
        runtime.dispatch(Action::SetAnswer {
            question_id: question_id.clone(),
            option_ids: option_ids.clone(),
        })?;
    }

    match runtime.dispatch(Action::ConfirmAll { now })? {
        Outcome::Summary(report) => Ok(*report),
        other => Err(AppError::InternalError(format!(
            "expected a summary, got {:?}",
            other
        ))),
    }
}

pub async fn read_answer_sheet(path: &Path) -> AppResult<AnswerSheet> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::StorageError(format!("cannot read '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::InvalidParameter(format!(
            "answer sheet '{}' is not valid JSON: {}",
            path.display(),
            e
        ))
    })
}
