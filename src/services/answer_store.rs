use std::collections::{HashMap, HashSet};

/// Selected options and reveal flags, keyed by question id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: HashMap<String, Vec<String>>,
    revealed: HashSet<String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection; an empty selection leaves the question unanswered.
    pub fn set_answer<I, S>(&mut self, question_id: &str, selected: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in selected {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        if ids.is_empty() {
            self.answers.remove(question_id);
        } else {
            self.answers.insert(question_id.to_string(), ids);
        }
    }

    /// Radio-button behaviour: the option becomes the only selection.
    pub fn select_single(&mut self, question_id: &str, option_id: &str) {
        self.set_answer(question_id, [option_id]);
    }

    /// Checkbox behaviour: the option is added or removed.
    pub fn toggle(&mut self, question_id: &str, option_id: &str) {
        let mut current = self.selection(question_id).to_vec();
        if let Some(pos) = current.iter().position(|id| id == option_id) {
            current.remove(pos);
        } else {
            current.push(option_id.to_string());
        }
        self.set_answer(question_id, current);
    }

    pub fn reveal(&mut self, question_id: &str) {
        self.revealed.insert(question_id.to_string());
    }

    /// Returns the question to its pristine state.
    pub fn clear(&mut self, question_id: &str) {
        self.answers.remove(question_id);
        self.revealed.remove(question_id);
    }

    pub fn clear_page<'a, I>(&mut self, question_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in question_ids {
            self.clear(id);
        }
    }

    pub fn selection(&self, question_id: &str) -> &[String] {
        self.answers
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        !self.selection(question_id).is_empty()
    }

    pub fn is_revealed(&self, question_id: &str) -> bool {
        self.revealed.contains(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}
