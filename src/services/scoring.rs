//! Pure reductions of a question list plus the answer store into verdicts and scores.
//!
//! Two percentages coexist on purpose: [`score_set`] divides by the number of
//! *answered* questions (the running page score), while [`score_overall`]
//! divides by the *total* (the final summary). Unanswered questions therefore
//! drag the final percentage down but not the page one.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::domain::{DifficultyBand, Question, Session};
use crate::services::answer_store::AnswerStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Correct,
    Incorrect,
    Unanswered,
}

/// Page (or any subset) score; percentage is over answered questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetScore {
    pub score: usize,
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
    pub passed: bool,
}

/// Whole-run score; percentage is over all questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverallScore {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percentage: u32,
    pub passed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BandStats {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
}

/// Card colouring for a single band in the breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandTier {
    Excellent,
    Good,
    Poor,
}

impl BandStats {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.correct, self.total)
    }

    fn record(&mut self, status: QuestionStatus) {
        self.total += 1;
        match status {
            QuestionStatus::Correct => self.correct += 1,
            QuestionStatus::Incorrect => self.incorrect += 1,
            QuestionStatus::Unanswered => self.unanswered += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub easy: BandStats,
    pub medium: BandStats,
    pub hard: BandStats,
}

impl DifficultyBreakdown {
    pub fn band(&self, band: DifficultyBand) -> &BandStats {
        match band {
            DifficultyBand::Easy => &self.easy,
            DifficultyBand::Medium => &self.medium,
            DifficultyBand::Hard => &self.hard,
        }
    }

    fn band_mut(&mut self, band: DifficultyBand) -> &mut BandStats {
        match band {
            DifficultyBand::Easy => &mut self.easy,
            DifficultyBand::Medium => &mut self.medium,
            DifficultyBand::Hard => &mut self.hard,
        }
    }

    /// Tier of one band's card, using that band's own thresholds.
    pub fn tier(&self, band: DifficultyBand) -> BandTier {
        let pct = self.band(band).percentage();
        let (excellent, good) = match band {
            DifficultyBand::Easy => (80, 60),
            DifficultyBand::Medium => (70, 50),
            DifficultyBand::Hard => (50, 30),
        };
        if pct >= excellent {
            BandTier::Excellent
        } else if pct >= good {
            BandTier::Good
        } else {
            BandTier::Poor
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub description: String,
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub passed: bool,
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// All-or-nothing: the selection, taken as a set, must match the answer key exactly.
pub fn is_correct(question: &Question, selected: &[String]) -> bool {
    let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();
    !chosen.is_empty()
        && chosen.len() == question.correct.len()
        && chosen.iter().all(|id| question.is_correct_option(id))
}

pub fn question_status(question: &Question, answers: &AnswerStore) -> QuestionStatus {
    let selected = answers.selection(&question.id);
    if selected.is_empty() {
        QuestionStatus::Unanswered
    } else if is_correct(question, selected) {
        QuestionStatus::Correct
    } else {
        QuestionStatus::Incorrect
    }
}

pub fn score_set(questions: &[Question], answers: &AnswerStore, passing_score: u8) -> SetScore {
    let mut score = 0;
    let mut answered = 0;

    for question in questions {
        match question_status(question, answers) {
            QuestionStatus::Correct => {
                score += 1;
                answered += 1;
            }
            QuestionStatus::Incorrect => answered += 1,
            QuestionStatus::Unanswered => {}
        }
    }

    let percentage = percentage(score, answered);
    SetScore {
        score,
        answered,
        total: questions.len(),
        percentage,
        passed: percentage >= u32::from(passing_score),
    }
}

pub fn score_overall(
    questions: &[Question],
    answers: &AnswerStore,
    passing_score: u8,
) -> OverallScore {
    let mut stats = BandStats::default();
    for question in questions {
        stats.record(question_status(question, answers));
    }

    let percentage = stats.percentage();
    OverallScore {
        correct: stats.correct,
        incorrect: stats.incorrect,
        unanswered: stats.unanswered,
        total: stats.total,
        percentage,
        passed: percentage >= u32::from(passing_score),
    }
}

pub fn score_by_difficulty(questions: &[Question], answers: &AnswerStore) -> DifficultyBreakdown {
    let mut breakdown = DifficultyBreakdown::default();
    for question in questions {
        breakdown
            .band_mut(question.band())
            .record(question_status(question, answers));
    }
    breakdown
}

/// Buckets by primary category in order of first appearance; uncategorised
/// questions are skipped.
pub fn score_by_category(session: &Session, answers: &AnswerStore) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for question in &session.questions {
        let Some(name) = question.primary_category() else {
            continue;
        };

        let slot = *index.entry(name).or_insert_with(|| {
            stats.push(CategoryStats {
                name: name.to_string(),
                description: session.category_description(name).to_string(),
                correct: 0,
                total: 0,
                percentage: 0,
                passed: false,
            });
            stats.len() - 1
        });

        let entry = &mut stats[slot];
        entry.total += 1;
        if question_status(question, answers) == QuestionStatus::Correct {
            entry.correct += 1;
        }
    }

    for entry in &mut stats {
        entry.percentage = percentage(entry.correct, entry.total);
        entry.passed = entry.percentage >= u32::from(session.passing_score);
    }

    stats
}
