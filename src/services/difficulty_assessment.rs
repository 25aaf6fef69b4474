//! Rule-based feedback over the difficulty breakdown.
//!
//! Easy questions are treated as the foundation: when the run contains any,
//! they decide the headline. Medium and then hard questions take over only
//! when the easier bands are absent.

use serde::Serialize;

use crate::services::scoring::{BandStats, DifficultyBreakdown};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallTier {
    Excellent,
    Good,
    NeedsWork,
}

impl OverallTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallTier::Excellent => "excellent",
            OverallTier::Good => "good",
            OverallTier::NeedsWork => "needs-work",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DifficultyAssessment {
    pub icon: &'static str,
    pub color_tag: &'static str,
    pub text: String,
    pub overall_tier: OverallTier,
}

#[derive(Clone, Copy)]
enum Headline {
    Excellent,
    Progress,
    KeepStudying,
    Neutral,
}

impl Headline {
    fn icon(self) -> &'static str {
        match self {
            Headline::Excellent => "🌟",
            Headline::Progress => "💪",
            Headline::KeepStudying => "📚",
            Headline::Neutral => "📊",
        }
    }

    fn color_tag(self) -> &'static str {
        match self {
            Headline::Excellent => "success",
            Headline::Progress => "warning",
            Headline::KeepStudying => "danger",
            Headline::Neutral => "neutral",
        }
    }
}

/// Percentage of a band, `None` when the run had no questions in it.
fn band_pct(stats: &BandStats) -> Option<u32> {
    (!stats.is_empty()).then(|| stats.percentage())
}

pub fn assess_difficulty(breakdown: &DifficultyBreakdown) -> DifficultyAssessment {
    let easy = band_pct(&breakdown.easy);
    let medium = band_pct(&breakdown.medium);
    let hard = band_pct(&breakdown.hard);

    let (headline, text) = narrative(easy, medium, hard, breakdown.easy.unanswered);

    DifficultyAssessment {
        icon: headline.icon(),
        color_tag: headline.color_tag(),
        text,
        overall_tier: overall_tier(easy, medium, hard),
    }
}

fn hard_followup(hard: Option<u32>) -> String {
    match hard {
        Some(pct) if pct >= 50 => {
            format!("You are also doing well on the hard questions ({}%). Keep it up!", pct)
        }
        Some(pct) => format!(
            "The hard questions ({}%) leave room to improve, but you are on the right track.",
            pct
        ),
        None => "Keep it up!".to_string(),
    }
}

fn narrative(
    easy: Option<u32>,
    medium: Option<u32>,
    hard: Option<u32>,
    easy_unanswered: usize,
) -> (Headline, String) {
    match (easy, medium, hard) {
        (Some(e), _, _) if e >= 80 => {
            let mut text = format!("Excellent! You mastered the easy questions ({}%). ", e);
            match medium {
                Some(m) if m >= 70 => {
                    text.push_str(&format!("Your medium results are strong too ({}%). ", m));
                    text.push_str(&hard_followup(hard));
                }
                Some(m) => text.push_str(&format!(
                    "The medium questions ({}%) need more attention; review the intermediate concepts.",
                    m
                )),
                None => text.push_str(&hard_followup(hard)),
            }
            (Headline::Excellent, text)
        }
        (Some(e), _, _) if e >= 60 => {
            let mut text = format!(
                "Good progress! You got {}% of the easy questions right. More practice will lift it further. ",
                e
            );
            match medium {
                Some(m) if m < 50 => text.push_str(&format!(
                    "Focus on strengthening the intermediate concepts ({}% on medium questions).",
                    m
                )),
                Some(m) => text.push_str(&format!(
                    "Your medium result ({}%) is reasonable. Keep studying!",
                    m
                )),
                None => {}
            }
            (Headline::Progress, text)
        }
        (Some(e), _, _) => {
            let mut text = format!(
                "Keep studying! You got only {}% of the easy questions, which are the fundamentals. Review the basics before moving on. ",
                e
            );
            if easy_unanswered > 0 {
                text.push_str(&format!(
                    "You left {} easy questions unanswered. ",
                    easy_unanswered
                ));
            }
            text.push_str("Practice more and retake the test!");
            (Headline::KeepStudying, text)
        }
        (None, Some(m), _) if m >= 70 => (
            Headline::Excellent,
            format!(
                "Excellent! You mastered the medium questions ({}%). {}",
                m,
                hard_followup(hard)
            ),
        ),
        (None, Some(m), _) if m >= 50 => {
            let mut text = format!(
                "Good progress! You got {}% of the medium questions right. ",
                m
            );
            if let Some(h) = hard {
                text.push_str(&format!("On the hard questions you scored {}%. Keep studying!", h));
            }
            (Headline::Progress, text)
        }
        (None, Some(m), _) => (
            Headline::KeepStudying,
            format!(
                "Keep studying! You got only {}% of the medium questions. Review the concepts and practice more!",
                m
            ),
        ),
        (None, None, Some(h)) if h >= 50 => (
            Headline::Excellent,
            format!("Excellent! You are doing very well on the hard questions ({}%)!", h),
        ),
        (None, None, Some(h)) if h >= 30 => (
            Headline::Progress,
            format!("Good progress! You got {}% of the hard questions. Keep practising!", h),
        ),
        (None, None, Some(h)) => (
            Headline::KeepStudying,
            format!(
                "Keep studying! Hard questions take more practice. You got {}%; review and try again!",
                h
            ),
        ),
        (None, None, None) => (
            Headline::Neutral,
            "No questions were scored. Keep practising!".to_string(),
        ),
    }
}

fn overall_tier(easy: Option<u32>, medium: Option<u32>, hard: Option<u32>) -> OverallTier {
    let medium_at = |threshold: u32| medium.map_or(true, |m| m >= threshold);
    let hard_at = |threshold: u32| hard.map_or(true, |h| h >= threshold);

    if let Some(e) = easy {
        if e >= 80 {
            if medium_at(70) && hard_at(40) {
                OverallTier::Excellent
            } else if medium_at(50) || hard_at(30) {
                OverallTier::Good
            } else {
                OverallTier::NeedsWork
            }
        } else if e >= 60 {
            OverallTier::Good
        } else {
            OverallTier::NeedsWork
        }
    } else if let Some(m) = medium {
        if m >= 70 {
            if hard_at(40) {
                OverallTier::Excellent
            } else {
                OverallTier::Good
            }
        } else if m >= 50 {
            OverallTier::Good
        } else {
            OverallTier::NeedsWork
        }
    } else if let Some(h) = hard {
        if h >= 50 {
            OverallTier::Excellent
        } else if h >= 30 {
            OverallTier::Good
        } else {
            OverallTier::NeedsWork
        }
    } else {
        OverallTier::NeedsWork
    }
}
