use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Certification, SessionMode};
use crate::services::pagination::PageSize;
use crate::services::session_builder::validate_random_count;

static TIME_LIMIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*$")
        .expect("TIME_LIMIT_REGEX is a valid regex pattern")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Full,
    Random,
}

/// Hours plus minutes as entered on the mode selection screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct TimeLimit {
    #[validate(range(max = 99))]
    pub hours: u32,
    #[validate(range(max = 59))]
    pub minutes: u32,
}

impl TimeLimit {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    /// Splits a recommended duration in minutes into hours and minutes.
    pub fn from_minutes(total_minutes: u32) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
        }
    }

    /// `None` means unlimited.
    pub fn as_seconds(&self) -> Option<u64> {
        let seconds = u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60;
        (seconds > 0).then_some(seconds)
    }

    /// Parses `1h30m`, `90m`, `2h` or `0`. Minutes above 59 roll into hours.
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        if trimmed == "0" {
            return Ok(Self::default());
        }

        let invalid = || {
            AppError::InvalidParameter(format!(
                "time limit '{}' must look like 1h30m, 90m or 2h",
                input
            ))
        };

        let caps = TIME_LIMIT_REGEX.captures(trimmed).ok_or_else(invalid)?;
        if caps.get(1).is_none() && caps.get(2).is_none() {
            return Err(invalid());
        }

        let number = |group: Option<regex::Match>| -> AppResult<u32> {
            match group {
                Some(m) => m.as_str().parse::<u32>().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        Self::from_parts(number(caps.get(1))?, number(caps.get(2))?)
    }

    /// Normalises hours plus minutes, rolling minutes above 59 into hours.
    pub fn from_parts(hours: u32, minutes: u32) -> AppResult<Self> {
        let total_minutes = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(|| {
                AppError::InvalidParameter(format!(
                    "time limit of {}h {}m is too long",
                    hours, minutes
                ))
            })?;

        let limit = Self::from_minutes(total_minutes);
        limit
            .validate()
            .map_err(|e| AppError::InvalidParameter(e.to_string()))?;
        Ok(limit)
    }
}

/// Everything the mode selection screen collects before a quiz starts.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(min = 1))]
    pub certification_id: String,
    pub mode: QuizMode,
    pub question_count: Option<usize>,
    #[validate(nested)]
    pub time_limit: TimeLimit,
    pub page_size: usize,
}

/// Validated, bank-checked parameters for a new quiz runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: SessionMode,
    pub time_limit_seconds: Option<u64>,
    pub page_size: PageSize,
}

impl StartQuizRequest {
    pub fn full(certification_id: &str, page_size: usize) -> Self {
        Self {
            certification_id: certification_id.to_string(),
            mode: QuizMode::Full,
            question_count: None,
            time_limit: TimeLimit::default(),
            page_size,
        }
    }

    pub fn random(
        certification_id: &str,
        question_count: usize,
        time_limit: TimeLimit,
        page_size: usize,
    ) -> Self {
        Self {
            certification_id: certification_id.to_string(),
            mode: QuizMode::Random,
            question_count: Some(question_count),
            time_limit,
            page_size,
        }
    }

    /// Checks the request against the selected bank. Nothing is started on error.
    pub fn into_options(self, bank: &Certification) -> AppResult<SessionOptions> {
        self.validate()
            .map_err(|e| AppError::InvalidParameter(e.to_string()))?;

        if self.certification_id != bank.id {
            return Err(AppError::InvalidParameter(format!(
                "request targets '{}' but bank '{}' was supplied",
                self.certification_id, bank.id
            )));
        }

        let page_size = PageSize::try_from(self.page_size)?;

        let (mode, time_limit_seconds) = match self.mode {
            // the full bank always runs with the elapsed clock
            QuizMode::Full => (SessionMode::Full, None),
            QuizMode::Random => {
                let count = self
                    .question_count
                    .unwrap_or_else(|| bank.default_random_count());
                validate_random_count(bank, count)?;
                (SessionMode::Random { count }, self.time_limit.as_seconds())
            }
        };

        Ok(SessionOptions {
            mode,
            time_limit_seconds,
            page_size,
        })
    }
}

/// Defaults pre-filled when a certification is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeDefaults {
    pub full_question_count: usize,
    pub random_question_count: usize,
    pub time_limit: TimeLimit,
}

impl ModeDefaults {
    pub fn for_certification(bank: &Certification) -> Self {
        Self {
            full_question_count: bank.questions.len(),
            random_question_count: bank.default_random_count(),
            time_limit: bank
                .recommended_time
                .map(TimeLimit::from_minutes)
                .unwrap_or_default(),
        }
    }
}

/// Prepared answers for batch grading: question id to selected option ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(pub HashMap<String, Vec<String>>);
