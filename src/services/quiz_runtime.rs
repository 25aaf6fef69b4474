use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Certification, DifficultyBand, Question, Session};
use crate::models::dto::request::SessionOptions;
use crate::models::dto::response::{
    BandReport, GridCell, OptionDetail, PageReport, PageView, QuestionDetail, QuestionView,
    SummaryReport, TimingReport,
};
use crate::services::answer_store::AnswerStore;
use crate::services::difficulty_assessment::assess_difficulty;
use crate::services::pagination::{PageSize, Pagination};
use crate::services::scoring::{
    question_status, score_by_category, score_by_difficulty, score_overall, score_set,
};
use crate::services::session_builder::build_session;
use crate::services::session_timer::{format_duration, SessionTimer, TimerTick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    InProgress,
    Summary,
}

/// Everything a user (or the clock) can do to a running quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SelectOption { question_id: String, option_id: String },
    SetAnswer { question_id: String, option_ids: Vec<String> },
    Reveal { question_id: String },
    ClearQuestion { question_id: String },
    ClearPage,
    ConfirmPage,
    ConfirmAll { now: DateTime<Utc> },
    BackToQuiz,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    SetPageSize(PageSize),
    Tick { now: DateTime<Utc> },
    ShowDetail { number: usize },
}

impl Action {
    fn mutates_answers(&self) -> bool {
        matches!(
            self,
            Action::SelectOption { .. }
                | Action::SetAnswer { .. }
                | Action::Reveal { .. }
                | Action::ClearQuestion { .. }
                | Action::ClearPage
                | Action::ConfirmPage
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    PageScored(PageReport),
    Summary(Box<SummaryReport>),
    Clock(TimerTick),
    Detail(QuestionDetail),
}

/// One quiz run: the session plus all of its mutable state.
#[derive(Debug)]
pub struct QuizRuntime {
    id: Uuid,
    session: Session,
    answers: AnswerStore,
    timer: SessionTimer,
    pagination: Pagination,
    phase: RunPhase,
}

impl QuizRuntime {
    /// Builds the session and starts the clock. Fails before any state exists
    /// when the options do not fit the bank.
    pub fn start<R: Rng + ?Sized>(
        bank: &Certification,
        options: SessionOptions,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AppResult<Self> {
        let session = build_session(bank, options.mode, rng)?;
        Ok(Self::from_session(session, options, now))
    }

    pub fn from_session(session: Session, options: SessionOptions, now: DateTime<Utc>) -> Self {
        let mut timer = SessionTimer::new();
        timer.start(now, options.time_limit_seconds);

        let runtime = Self {
            id: Uuid::new_v4(),
            pagination: Pagination::new(session.question_count(), options.page_size),
            session,
            answers: AnswerStore::new(),
            timer,
            phase: RunPhase::InProgress,
        };

        log::info!(
            "Quiz run {} started: '{}' ({} questions, limit {:?})",
            runtime.id,
            runtime.session.name,
            runtime.session.question_count(),
            runtime.timer.limit_seconds()
        );

        runtime
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Timer display as of the last tick.
    pub fn clock(&self) -> TimerTick {
        self.timer.snapshot()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn question(&self, question_id: &str) -> AppResult<&Question> {
        self.session.question(question_id).ok_or_else(|| {
            AppError::NotFound(format!("question '{}' is not part of this quiz", question_id))
        })
    }

    fn ensure_option(question: &Question, option_id: &str) -> AppResult<()> {
        if question.has_option(option_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "question '{}' has no option '{}'",
                question.id, option_id
            )))
        }
    }

    fn page_questions(&self) -> &[Question] {
        let (start, end) = self.pagination.window();
        &self.session.questions[start..end]
    }

    pub fn dispatch(&mut self, action: Action) -> AppResult<Outcome> {
        if self.phase == RunPhase::Summary && action.mutates_answers() {
            log::debug!("Quiz run {} rejected {:?} during summary", self.id, action);
            return Err(AppError::InvalidState(
                "answers are locked while the summary is shown; go back to the quiz first"
                    .to_string(),
            ));
        }

        match action {
            Action::SelectOption {
                question_id,
                option_id,
            } => {
                let question = self.question(&question_id)?;
                Self::ensure_option(question, &option_id)?;
                if question.is_multi_answer() {
                    self.answers.toggle(&question_id, &option_id);
                } else {
                    self.answers.select_single(&question_id, &option_id);
                }
                Ok(Outcome::Updated)
            }
            Action::SetAnswer {
                question_id,
                option_ids,
            } => {
                let question = self.question(&question_id)?;
                for option_id in &option_ids {
                    Self::ensure_option(question, option_id)?;
                }
                self.answers.set_answer(&question_id, option_ids);
                Ok(Outcome::Updated)
            }
            Action::Reveal { question_id } => {
                self.question(&question_id)?;
                self.answers.reveal(&question_id);
                Ok(Outcome::Updated)
            }
            Action::ClearQuestion { question_id } => {
                self.question(&question_id)?;
                self.answers.clear(&question_id);
                Ok(Outcome::Updated)
            }
            Action::ClearPage => {
                let (start, end) = self.pagination.window();
                self.answers.clear_page(
                    self.session.questions[start..end]
                        .iter()
                        .map(|q| q.id.as_str()),
                );
                Ok(Outcome::Updated)
            }
            Action::ConfirmPage => {
                let (start, end) = self.pagination.window();
                for question in &self.session.questions[start..end] {
                    self.answers.reveal(&question.id);
                }
                Ok(Outcome::PageScored(self.page_report()))
            }
            Action::ConfirmAll { now } => {
                self.timer.stop(now);
                self.phase = RunPhase::Summary;
                let summary = self.summary_report();
                log::info!(
                    "Quiz run {} finished: {}/{} correct ({}%) in {}s",
                    self.id,
                    summary.overall.correct,
                    summary.overall.total,
                    summary.overall.percentage,
                    summary.timing.elapsed_seconds
                );
                Ok(Outcome::Summary(Box::new(summary)))
            }
            Action::BackToQuiz => {
                self.phase = RunPhase::InProgress;
                Ok(Outcome::Updated)
            }
            Action::FirstPage => {
                self.pagination.first();
                Ok(Outcome::Updated)
            }
            Action::PrevPage => {
                self.pagination.prev();
                Ok(Outcome::Updated)
            }
            Action::NextPage => {
                self.pagination.next();
                Ok(Outcome::Updated)
            }
            Action::LastPage => {
                self.pagination.last();
                Ok(Outcome::Updated)
            }
            Action::SetPageSize(page_size) => {
                self.pagination.set_page_size(page_size);
                Ok(Outcome::Updated)
            }
            Action::Tick { now } => Ok(Outcome::Clock(self.timer.advance_clock(now))),
            Action::ShowDetail { number } => Ok(Outcome::Detail(self.question_detail(number)?)),
        }
    }

    pub fn page_view(&self) -> PageView<'_> {
        let (start, end) = self.pagination.window();
        let questions = self.session.questions[start..end]
            .iter()
            .enumerate()
            .map(|(offset, question)| {
                let revealed = self.answers.is_revealed(&question.id);
                QuestionView {
                    number: start + offset + 1,
                    question,
                    selected: self.answers.selection(&question.id),
                    revealed,
                    status: revealed.then(|| question_status(question, &self.answers)),
                }
            })
            .collect();

        PageView {
            title: &self.session.name,
            page_index: self.pagination.current_page(),
            total_pages: self.pagination.total_pages(),
            page_size: self.pagination.page_size().get(),
            first_number: start + 1,
            last_number: end,
            total_questions: self.session.question_count(),
            questions,
            nav: self.pagination.nav_state(),
        }
    }

    pub fn page_report(&self) -> PageReport {
        let (start, end) = self.pagination.window();
        PageReport {
            first_number: start + 1,
            last_number: end,
            score: score_set(
                self.page_questions(),
                &self.answers,
                self.session.passing_score,
            ),
        }
    }

    pub fn summary_report(&self) -> SummaryReport {
        let questions = &self.session.questions;
        let breakdown = score_by_difficulty(questions, &self.answers);

        let bands = [
            DifficultyBand::Easy,
            DifficultyBand::Medium,
            DifficultyBand::Hard,
        ]
        .into_iter()
        .filter(|band| !breakdown.band(*band).is_empty())
        .map(|band| {
            let stats = *breakdown.band(band);
            BandReport {
                band,
                label: band.label(),
                percentage: stats.percentage(),
                stats,
                tier: breakdown.tier(band),
            }
        })
        .collect();

        let grid = questions
            .iter()
            .enumerate()
            .map(|(index, question)| GridCell {
                number: index + 1,
                question_id: question.id.clone(),
                status: question_status(question, &self.answers),
            })
            .collect();

        let elapsed_seconds = self.timer.elapsed_seconds();
        let limit_seconds = self.timer.limit_seconds();

        SummaryReport {
            title: self.session.name.clone(),
            passing_score: self.session.passing_score,
            overall: score_overall(questions, &self.answers, self.session.passing_score),
            bands,
            assessment: assess_difficulty(&breakdown),
            categories: score_by_category(&self.session, &self.answers),
            grid,
            timing: TimingReport {
                elapsed_seconds,
                elapsed: format_duration(elapsed_seconds),
                limit_seconds,
                limit: limit_seconds.map(format_duration),
                exceeded: self.timer.time_exceeded(),
            },
        }
    }

    pub fn question_detail(&self, number: usize) -> AppResult<QuestionDetail> {
        let question = self.session.question_by_number(number).ok_or_else(|| {
            AppError::NotFound(format!(
                "question number {} (this quiz has {})",
                number,
                self.session.question_count()
            ))
        })?;
        let selected = self.answers.selection(&question.id);

        Ok(QuestionDetail {
            number,
            question_id: question.id.clone(),
            text: question.text.clone(),
            status: question_status(question, &self.answers),
            options: question
                .options
                .iter()
                .map(|option| OptionDetail {
                    id: option.id.clone(),
                    text: option.text.clone(),
                    is_correct: question.is_correct_option(&option.id),
                    was_selected: selected.contains(&option.id),
                })
                .collect(),
            explanation: question.explanation.clone(),
        })
    }
}
