use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::Question;

/// Passing percentage applied when a certification does not configure one.
pub const DEFAULT_PASSING_SCORE: u8 = 70;

/// Fallback for the random-mode question count when the bank has no recommendation.
pub const DEFAULT_RANDOM_COUNT: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1, message = "certification must contain at least one question"))]
    #[validate(nested)]
    pub questions: Vec<Question>,
    #[serde(default = "default_passing_score")]
    #[validate(range(max = 100))]
    pub passing_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_questions: Option<usize>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_time: Option<u32>,
    #[serde(default)]
    pub categories: Vec<CertificationCategory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct CertificationCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// On-disk shape of a bank file: one certification or an aggregate list.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CertificationDocument {
    Single { certification: Certification },
    Aggregate { certifications: Vec<Certification> },
}

impl CertificationDocument {
    pub fn into_certifications(self) -> Vec<Certification> {
        match self {
            CertificationDocument::Single { certification } => vec![certification],
            CertificationDocument::Aggregate { certifications } => certifications,
        }
    }
}

/// Listing entry shown before a quiz is started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificationSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

fn default_passing_score() -> u8 {
    DEFAULT_PASSING_SCORE
}

impl Certification {
    /// Field validation plus the cross-reference checks the derive cannot express.
    pub fn check_integrity(&self) -> AppResult<()> {
        self.validate()?;

        let mut question_ids = HashSet::new();
        for question in &self.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(AppError::DataIntegrityViolation(format!(
                    "certification '{}' has duplicate question id '{}'",
                    self.id, question.id
                )));
            }

            let mut option_ids = HashSet::new();
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(AppError::DataIntegrityViolation(format!(
                        "question '{}' has duplicate option id '{}'",
                        question.id, option.id
                    )));
                }
            }

            let mut correct_ids = HashSet::new();
            for correct in &question.correct {
                if !option_ids.contains(correct.as_str()) {
                    return Err(AppError::DataIntegrityViolation(format!(
                        "question '{}' marks unknown option '{}' as correct",
                        question.id, correct
                    )));
                }
                if !correct_ids.insert(correct.as_str()) {
                    return Err(AppError::DataIntegrityViolation(format!(
                        "question '{}' lists correct option '{}' twice",
                        question.id, correct
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> CertificationSummary {
        CertificationSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            question_count: self.questions.len(),
        }
    }

    /// Random-mode question count offered when the certification is selected.
    /// A recommendation of zero counts as none.
    pub fn default_random_count(&self) -> usize {
        self.recommended_questions
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_RANDOM_COUNT)
            .min(self.questions.len())
    }
}
