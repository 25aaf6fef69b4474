use serde::Serialize;

use crate::models::domain::{DifficultyBand, Question};
use crate::services::difficulty_assessment::DifficultyAssessment;
use crate::services::pagination::NavState;
use crate::services::scoring::{
    BandStats, BandTier, CategoryStats, OverallScore, QuestionStatus, SetScore,
};

/// A question as it appears on the current page.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView<'a> {
    /// One-based position in the run.
    pub number: usize,
    pub question: &'a Question,
    pub selected: &'a [String],
    pub revealed: bool,
    /// Only present once the answer has been revealed.
    pub status: Option<QuestionStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub page_index: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// One-based, inclusive.
    pub first_number: usize,
    pub last_number: usize,
    pub total_questions: usize,
    pub questions: Vec<QuestionView<'a>>,
    pub nav: NavState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub first_number: usize,
    pub last_number: usize,
    pub score: SetScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandReport {
    pub band: DifficultyBand,
    pub label: &'static str,
    pub stats: BandStats,
    pub percentage: u32,
    pub tier: BandTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub number: usize,
    pub question_id: String,
    pub status: QuestionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub elapsed_seconds: u64,
    pub elapsed: String,
    pub limit_seconds: Option<u64>,
    pub limit: Option<String>,
    pub exceeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub title: String,
    pub passing_score: u8,
    pub overall: OverallScore,
    /// Bands that contained at least one question.
    pub bands: Vec<BandReport>,
    pub assessment: DifficultyAssessment,
    pub categories: Vec<CategoryStats>,
    pub grid: Vec<GridCell>,
    pub timing: TimingReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDetail {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    pub was_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDetail {
    pub number: usize,
    pub question_id: String,
    pub text: String,
    pub status: QuestionStatus,
    pub options: Vec<OptionDetail>,
    pub explanation: String,
}
