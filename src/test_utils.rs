use crate::models::domain::{
    certification::CertificationCategory, Certification, Question, QuestionOption, Session,
    SessionMode,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    fn options(ids: &[&str]) -> Vec<QuestionOption> {
        ids.iter()
            .map(|id| QuestionOption {
                id: id.to_string(),
                text: format!("Option {}", id.to_uppercase()),
            })
            .collect()
    }

    /// Question with options `a`..`d` and one correct option.
    pub fn single_answer_question(id: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            options: options(&["a", "b", "c", "d"]),
            correct: vec![correct.to_string()],
            explanation: format!("Because {} is right", correct),
            difficulty: 5,
            category: vec![],
        }
    }

    /// Question with options `a`..`d` and several correct options.
    pub fn multi_answer_question(id: &str, correct: &[&str]) -> Question {
        Question {
            correct: correct.iter().map(|c| c.to_string()).collect(),
            ..single_answer_question(id, correct[0])
        }
    }

    pub fn question_with(id: &str, difficulty: u8, category: &[&str]) -> Question {
        Question {
            difficulty,
            category: category.iter().map(|c| c.to_string()).collect(),
            ..single_answer_question(id, "a")
        }
    }

    /// Twelve questions spread over all bands, two categories and one uncategorised.
    pub fn sample_certification() -> Certification {
        let questions = vec![
            question_with("q1", 1, &["Apex", "Triggers"]),
            question_with("q2", 2, &["Apex"]),
            question_with("q3", 3, &["Data Modeling"]),
            question_with("q4", 4, &["Apex"]),
            question_with("q5", 5, &["Data Modeling"]),
            question_with("q6", 6, &[]),
            question_with("q7", 7, &["Apex"]),
            question_with("q8", 8, &["Data Modeling", "Apex"]),
            question_with("q9", 9, &["Apex"]),
            question_with("q10", 10, &["Testing"]),
            multi_answer_question("q11", &["a", "c"]),
            single_answer_question("q12", "b"),
        ];

        Certification {
            id: "pd1".to_string(),
            name: "Platform Developer I".to_string(),
            questions,
            passing_score: 70,
            recommended_questions: Some(5),
            recommended_time: Some(90),
            categories: vec![
                CertificationCategory {
                    name: "Apex".to_string(),
                    description: "Apex language fundamentals".to_string(),
                },
                CertificationCategory {
                    name: "Data Modeling".to_string(),
                    description: "Objects, fields and relationships".to_string(),
                },
            ],
        }
    }

    /// Bank of `count` single-answer questions whose correct option is always `a`.
    pub fn certification_with_questions(count: usize) -> Certification {
        Certification {
            id: "bulk".to_string(),
            name: "Bulk Bank".to_string(),
            questions: (1..=count)
                .map(|n| single_answer_question(&format!("q{}", n), "a"))
                .collect(),
            passing_score: 70,
            recommended_questions: None,
            recommended_time: None,
            categories: vec![],
        }
    }

    pub fn sample_session() -> Session {
        let cert = sample_certification();
        Session {
            name: cert.name,
            certification_id: cert.id,
            mode: SessionMode::Full,
            questions: cert.questions,
            passing_score: cert.passing_score,
            categories: cert.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_certification_is_consistent() {
        let cert = sample_certification();
        assert_eq!(cert.questions.len(), 12);
        assert!(cert.check_integrity().is_ok());
    }

    #[test]
    fn test_fixtures_multi_answer_question() {
        let question = multi_answer_question("m", &["a", "c"]);
        assert!(question.is_multi_answer());
        assert_eq!(question.options.len(), 4);
    }

    #[test]
    fn test_fixtures_bulk_certification() {
        let cert = certification_with_questions(23);
        assert_eq!(cert.questions.len(), 23);
        assert_eq!(cert.questions[22].id, "q23");
        assert!(cert.check_integrity().is_ok());
    }
}
