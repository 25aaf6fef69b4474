use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_DIFFICULTY: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuestionOption {
    #[validate(length(min = 1))]
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct Question {
    #[validate(length(min = 1))]
    pub id: String,
    pub text: String,
    #[validate(length(min = 1, message = "question must offer at least one option"))]
    #[validate(nested)]
    pub options: Vec<QuestionOption>,
    #[validate(length(min = 1, message = "question must name at least one correct option"))]
    pub correct: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_difficulty")]
    #[validate(range(min = 1, max = 10))]
    pub difficulty: u8,
    /// First entry is the primary category used for grouping.
    #[serde(default)]
    pub category: Vec<String>,
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

/// Difficulty bucket used for breakdown reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=3 => DifficultyBand::Easy,
            4..=6 => DifficultyBand::Medium,
            _ => DifficultyBand::Hard,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyBand::Easy => "Easy (1-3)",
            DifficultyBand::Medium => "Medium (4-6)",
            DifficultyBand::Hard => "Hard (7-10)",
        }
    }
}

impl Question {
    /// More than one correct option means the question is answered with checkboxes.
    pub fn is_multi_answer(&self) -> bool {
        self.correct.len() > 1
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.category.first().map(String::as_str)
    }

    pub fn band(&self) -> DifficultyBand {
        DifficultyBand::from_difficulty(self.difficulty)
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn is_correct_option(&self, option_id: &str) -> bool {
        self.correct.iter().any(|c| c == option_id)
    }

    /// Option at a zero-based display position, e.g. `B` -> 1.
    pub fn option_at(&self, position: usize) -> Option<&QuestionOption> {
        self.options.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_defaults_apply_when_fields_are_missing() {
        let json = r#"{
            "id": "q1",
            "text": "Which one?",
            "options": [{"id": "a", "text": "A"}, {"id": "b", "text": "B"}],
            "correct": ["b"]
        }"#;

        let question: Question = serde_json::from_str(json).expect("question should parse");

        assert_eq!(question.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(question.explanation, "");
        assert!(question.category.is_empty());
        assert_eq!(question.band(), DifficultyBand::Medium);
        assert!(!question.is_multi_answer());
    }

    #[test]
    fn difficulty_band_boundaries() {
        assert_eq!(DifficultyBand::from_difficulty(1), DifficultyBand::Easy);
        assert_eq!(DifficultyBand::from_difficulty(3), DifficultyBand::Easy);
        assert_eq!(DifficultyBand::from_difficulty(4), DifficultyBand::Medium);
        assert_eq!(DifficultyBand::from_difficulty(6), DifficultyBand::Medium);
        assert_eq!(DifficultyBand::from_difficulty(7), DifficultyBand::Hard);
        assert_eq!(DifficultyBand::from_difficulty(10), DifficultyBand::Hard);
    }

    #[test]
    fn primary_category_is_first_entry() {
        let question = Question {
            id: "q1".to_string(),
            text: "t".to_string(),
            options: vec![QuestionOption {
                id: "a".to_string(),
                text: "A".to_string(),
            }],
            correct: vec!["a".to_string()],
            explanation: String::new(),
            difficulty: 2,
            category: vec!["Apex".to_string(), "Triggers".to_string()],
        };

        assert_eq!(question.primary_category(), Some("Apex"));
        assert!(question.is_correct_option("a"));
        assert!(question.has_option("a"));
        assert!(!question.has_option("z"));
        assert_eq!(question.option_at(0).map(|o| o.id.as_str()), Some("a"));
        assert!(question.option_at(1).is_none());
    }

    #[test]
    fn question_with_no_options_fails_validation() {
        let question = Question {
            id: "q1".to_string(),
            text: "t".to_string(),
            options: vec![],
            correct: vec!["a".to_string()],
            explanation: String::new(),
            difficulty: 5,
            category: vec![],
        };

        assert!(question.validate().is_err());
    }

    #[test]
    fn difficulty_out_of_range_fails_validation() {
        let question = Question {
            id: "q1".to_string(),
            text: "t".to_string(),
            options: vec![QuestionOption {
                id: "a".to_string(),
                text: "A".to_string(),
            }],
            correct: vec!["a".to_string()],
            explanation: String::new(),
            difficulty: 11,
            category: vec![],
        };

        assert!(question.validate().is_err());
    }
}
