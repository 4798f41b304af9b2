use log::debug;
use thiserror::Error;

use crate::libwaraqa::question::Question;
use crate::libwaraqa::sanitize;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("cannot delete the sole question")]
    SoleQuestion,
    #[error("question index {0} out of bounds")]
    OutOfBounds(usize),
}

/// Ordered list of sanitized questions plus the selection cursor. The store
/// is the only mutator of the list: editors hand it fully built questions
/// and never touch one in place.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    questions: Vec<Question>,
    current: usize,
}

impl QuestionStore {
    pub fn new(questions: Vec<Question>, current: usize) -> QuestionStore {
        let questions = if questions.is_empty() {
            vec![sanitize::placeholder()]
        } else {
            questions
        };
        let current = current.min(questions.len() - 1);
        QuestionStore { questions, current }
    }

    pub fn fresh() -> QuestionStore {
        QuestionStore::new(Vec::new(), 0)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn select(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.questions.len() {
            return Err(StoreError::OutOfBounds(index));
        }
        self.current = index;
        Ok(())
    }

    /// Inserts at `at` (or appends when `at` is `None`) and moves the cursor
    /// to the new question.
    pub fn add(&mut self, question: Question, at: Option<usize>) {
        let index = at.unwrap_or(self.questions.len()).min(self.questions.len());
        self.questions.insert(index, question);
        self.current = index;
        debug!("[Store] Added question at {} ({} total)", index, self.questions.len());
    }

    pub fn update(&mut self, index: usize, question: Question) -> Result<(), StoreError> {
        match self.questions.get_mut(index) {
            Some(slot) => {
                *slot = question;
                Ok(())
            }
            None => Err(StoreError::OutOfBounds(index)),
        }
    }

    /// Removing at or before the cursor pulls the cursor back one step,
    /// never below zero. The last remaining question cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<Question, StoreError> {
        if self.questions.len() <= 1 {
            return Err(StoreError::SoleQuestion);
        }
        if index >= self.questions.len() {
            return Err(StoreError::OutOfBounds(index));
        }
        let removed = self.questions.remove(index);
        if self.current >= index {
            self.current = self.current.saturating_sub(1);
        }
        debug!("[Store] Removed question {} ({} left)", index, self.questions.len());
        Ok(removed)
    }

    /// Deep-clones `index` and inserts the copy immediately after it; the
    /// cursor follows the copy.
    pub fn duplicate(&mut self, index: usize) -> Result<(), StoreError> {
        let copy = self
            .questions
            .get(index)
            .cloned()
            .ok_or(StoreError::OutOfBounds(index))?;
        self.questions.insert(index + 1, copy);
        self.current = index + 1;
        Ok(())
    }

    /// Stable reorder. Out-of-range indices leave the list untouched. The
    /// cursor follows a moved selection and shifts around moves that cross it.
    pub fn move_question(&mut self, from: usize, to: usize) {
        if !move_item(&mut self.questions, from, to) || from == to {
            return;
        }
        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
    }

    /// Merges an import batch as one atomic append. A store still holding
    /// nothing but the untouched placeholder is replaced outright.
    pub fn import(&mut self, incoming: Vec<Question>) {
        if incoming.is_empty() {
            return;
        }
        if self.questions.len() == 1 && self.questions[0].is_blank_placeholder() {
            self.questions = incoming;
            self.current = 0;
        } else {
            self.questions.extend(incoming);
        }
    }
}

/// Moves the element at `from` so it ends up at `to`, shifting everything in
/// between. Returns false (list unchanged) when either index is out of range.
/// Shared by question reorder and by option/pair/item reorder inside one
/// question editor.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let moved = items.remove(from);
    items.insert(to, moved);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libwaraqa::question::{MediaContent, QuestionBody, ReadingContent};

    fn tf(label: &str) -> Question {
        Question {
            reading: ReadingContent::empty(),
            question: MediaContent {
                text: label.to_string(),
                image: None,
            },
            feedback: String::new(),
            body: QuestionBody::TrueFalse {
                correct_answer: true,
            },
        }
    }

    fn labels(store: &QuestionStore) -> Vec<&str> {
        store.questions().iter().map(|q| q.question.text.as_str()).collect()
    }

    #[test]
    fn empty_store_gets_a_placeholder() {
        let store = QuestionStore::fresh();
        assert_eq!(store.len(), 1);
        assert!(store.current().is_blank_placeholder());
    }

    #[test]
    fn sole_question_cannot_be_removed() {
        let mut store = QuestionStore::fresh();
        assert_eq!(store.remove(0), Err(StoreError::SoleQuestion));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_rebases_cursor() {
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c")], 2);
        store.remove(1).expect("remove succeeds");
        assert_eq!(store.current_index(), 1);
        assert_eq!(labels(&store), vec!["a", "c"]);

        // removing after the cursor leaves it alone
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c")], 0);
        store.remove(2).expect("remove succeeds");
        assert_eq!(store.current_index(), 0);

        // cursor never goes below zero
        let mut store = QuestionStore::new(vec![tf("a"), tf("b")], 0);
        store.remove(0).expect("remove succeeds");
        assert_eq!(store.current_index(), 0);
        assert_eq!(labels(&store), vec!["b"]);
    }

    #[test]
    fn duplicate_inserts_right_after_and_selects_copy() {
        let mut store = QuestionStore::new(vec![tf("a"), tf("b")], 0);
        store.duplicate(0).expect("duplicate succeeds");
        assert_eq!(labels(&store), vec!["a", "a", "b"]);
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn move_preserves_multiset_and_length() {
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c"), tf("d")], 0);
        store.move_question(0, 2);
        assert_eq!(labels(&store), vec!["b", "c", "a", "d"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn move_out_of_range_is_a_no_op() {
        let mut store = QuestionStore::new(vec![tf("a"), tf("b")], 1);
        store.move_question(0, 5);
        store.move_question(7, 0);
        assert_eq!(labels(&store), vec!["a", "b"]);
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn cursor_follows_moved_selection() {
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c")], 0);
        store.move_question(0, 2);
        assert_eq!(store.current_index(), 2);

        // a move crossing over the cursor shifts it by one
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c")], 1);
        store.move_question(0, 2);
        assert_eq!(store.current_index(), 0);
        let mut store = QuestionStore::new(vec![tf("a"), tf("b"), tf("c")], 1);
        store.move_question(2, 0);
        assert_eq!(store.current_index(), 2);
    }

    #[test]
    fn import_replaces_untouched_placeholder() {
        let mut store = QuestionStore::fresh();
        store.import(vec![tf("x"), tf("y")]);
        assert_eq!(labels(&store), vec!["x", "y"]);
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn import_appends_to_edited_store() {
        let mut store = QuestionStore::new(vec![tf("a")], 0);
        store.import(vec![tf("x")]);
        assert_eq!(labels(&store), vec!["a", "x"]);
    }

    #[test]
    fn move_item_is_shared_and_total() {
        let mut v = vec![1, 2, 3];
        assert!(move_item(&mut v, 2, 0));
        assert_eq!(v, vec![3, 1, 2]);
        assert!(!move_item(&mut v, 0, 3));
        assert_eq!(v, vec![3, 1, 2]);
    }
}
