use serde::{Deserialize, Serialize};

use crate::models::domain::certification::CertificationCategory;
use crate::models::domain::question::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Full,
    Random { count: usize },
}

/// The concrete question run derived from a certification when a quiz starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub name: String,
    pub certification_id: String,
    pub mode: SessionMode,
    pub questions: Vec<Question>,
    pub passing_score: u8,
    pub categories: Vec<CertificationCategory>,
}

impl Session {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Question by its one-based position in the run.
    pub fn question_by_number(&self, number: usize) -> Option<&Question> {
        number
            .checked_sub(1)
            .and_then(|index| self.questions.get(index))
    }

    pub fn category_description(&self, name: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }
}
