use rand::Rng;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Certification, Question, Session, SessionMode};
use crate::services::shuffle::shuffle;

/// Checks a random-mode count against the bank before anything is built.
pub fn validate_random_count(bank: &Certification, count: usize) -> AppResult<()> {
    let size = bank.questions.len();
    if count == 0 || count > size {
        return Err(AppError::InvalidParameter(format!(
            "choose a number between 1 and {} for '{}' (got {})",
            size, bank.id, count
        )));
    }
    Ok(())
}

/// Derives the question run for a quiz start.
///
/// `Full` keeps the bank verbatim. `Random { count }` shuffles the bank, takes
/// the first `count` questions and shuffles each one's options on its own;
/// answer keys reference option ids, so they survive the reordering untouched.
pub fn build_session<R: Rng + ?Sized>(
    bank: &Certification,
    mode: SessionMode,
    rng: &mut R,
) -> AppResult<Session> {
    let (name, questions) = match mode {
        SessionMode::Full => (bank.name.clone(), bank.questions.clone()),
        SessionMode::Random { count } => {
            validate_random_count(bank, count)?;

            let questions: Vec<Question> = shuffle(&bank.questions, rng)
                .into_iter()
                .take(count)
                .map(|question| Question {
                    options: shuffle(&question.options, rng),
                    ..question
                })
                .collect();

            (
                format!("{} - Random Test ({} questions)", bank.name, count),
                questions,
            )
        }
    };

    log::debug!(
        "Built session '{}' from '{}' with {} questions",
        name,
        bank.id,
        questions.len()
    );

    Ok(Session {
        name,
        certification_id: bank.id.clone(),
        mode,
        questions,
        passing_score: bank.passing_score,
        categories: bank.categories.clone(),
    })
}
