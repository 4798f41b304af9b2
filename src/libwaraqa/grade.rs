use rand::seq::SliceRandom;

use crate::libwaraqa::question::{Question, QuestionBody};

/// Minimum score share for certificate eligibility, in percent.
pub const PASS_PERCENTAGE: u32 = 80;

/// Seconds per question in the interactive quiz when the config does not set
/// its own value.
pub const DEFAULT_QUESTION_TIME: u32 = 45;

/// A user's arrangement for one question, as plain data. How the arrangement
/// was produced (drag, click pairing, typing) is the renderer's business;
/// grading only ever sees this.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Selected option, mapped back to its original index.
    Choice(usize),
    Boolean(bool),
    Text(String),
    /// Final sequence of original item indices, top to bottom.
    Order(Vec<usize>),
    /// Per drop zone (one per prompt, authored order): the original
    /// pair-index of the dropped answer, or `None` while empty.
    Placements(Vec<Option<usize>>),
    /// Click-click connections as (prompt index, answer original index).
    Connections(Vec<(usize, usize)>),
    /// Classification state: items left in the pool, and placed items as
    /// (item index, id of the group zone holding it).
    Buckets {
        pool: Vec<usize>,
        placed: Vec<(usize, String)>,
    },
    /// Timer expiry or explicit skip; never correct.
    Skip,
}

/// Splits a `|`-separated answer field into trimmed candidates.
pub fn answer_candidates(field: &str) -> Vec<&str> {
    field.split('|').map(str::trim).collect()
}

/// Maps a response to a correctness verdict. Total over every
/// (question, response) combination; a response of the wrong shape for the
/// question's type is simply incorrect.
pub fn verdict(question: &Question, response: &Response) -> bool {
    match (&question.body, response) {
        (QuestionBody::MultipleChoice { correct, .. }, Response::Choice(selected)) => {
            selected == correct
        }
        (QuestionBody::TrueFalse { correct_answer }, Response::Boolean(selected)) => {
            selected == correct_answer
        }
        // trimmed, case-sensitive exact membership
        (QuestionBody::FillInTheBlank { correct_answer }, Response::Text(input)) => {
            answer_candidates(correct_answer).contains(&input.trim())
        }
        // substring containment, not exact match
        (QuestionBody::ShortAnswer { correct_answer }, Response::Text(input)) => {
            let input = input.trim();
            answer_candidates(correct_answer)
                .iter()
                .any(|candidate| input.contains(candidate))
        }
        (QuestionBody::Ordering { items }, Response::Order(order)) => {
            order.len() == items.len() && order.iter().enumerate().all(|(i, &orig)| orig == i)
        }
        (QuestionBody::Matching { pairs }, Response::Placements(placements)) => {
            placements.len() == pairs.len()
                && placements
                    .iter()
                    .enumerate()
                    .all(|(zone, occupant)| *occupant == Some(zone))
        }
        (QuestionBody::ConnectingLines { pairs }, Response::Connections(connections)) => {
            connections.len() == pairs.len()
                && connections.iter().all(|&(prompt, answer)| prompt == answer)
        }
        (QuestionBody::Classification { items, .. }, Response::Buckets { pool, placed }) => {
            pool.is_empty()
                && placed.len() == items.len()
                && placed.iter().all(|(index, zone_id)| {
                    items
                        .get(*index)
                        .map(|item| !item.group_id.is_empty() && item.group_id == *zone_id)
                        .unwrap_or(false)
                })
        }
        _ => false,
    }
}

/// Random permutation of `0..len`, Fisher–Yates. Presentation order for
/// options, ordering items, matching/connecting answers and classification
/// pools; grading always works in original indices.
pub fn shuffled_indices(len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut rand::rng());
    indices
}

/// Per-question play state: `unanswered -> answered(correct | incorrect)`,
/// locked once answered. One point per correct question.
#[derive(Debug, Clone)]
pub struct QuizSession {
    answered: Vec<Option<bool>>,
    current: usize,
}

impl QuizSession {
    pub fn new(total: usize) -> QuizSession {
        QuizSession {
            answered: vec![None; total],
            current: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.answered.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answered.get(index).copied().flatten().is_some()
    }

    /// Commits a verdict. Returns false (and changes nothing) when the
    /// question was already answered in this play-through.
    pub fn commit(&mut self, index: usize, correct: bool) -> bool {
        match self.answered.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(correct);
                true
            }
            _ => false,
        }
    }

    /// Moves to the next question; returns false when already at the end.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.answered.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn score(&self) -> usize {
        self.answered.iter().filter(|a| **a == Some(true)).count()
    }

    pub fn percentage(&self) -> u32 {
        if self.answered.is_empty() {
            return 0;
        }
        (self.score() * 100 / self.answered.len()) as u32
    }

    pub fn passed(&self) -> bool {
        self.percentage() >= PASS_PERCENTAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libwaraqa::question::{
        ClassItem, Group, MediaContent, Pair, Question, ReadingContent,
    };

    fn question(body: QuestionBody) -> Question {
        Question {
            reading: ReadingContent::empty(),
            question: MediaContent::empty(),
            feedback: String::new(),
            body,
        }
    }

    fn media(text: &str) -> MediaContent {
        MediaContent {
            text: text.to_string(),
            image: None,
        }
    }

    fn pair(p: &str, a: &str) -> Pair {
        Pair {
            prompt: media(p),
            answer: media(a),
        }
    }

    #[test]
    fn multiple_choice_matches_original_index_only() {
        let q = question(QuestionBody::MultipleChoice {
            options: vec![media("A"), media("B"), media("C")],
            correct: 1,
        });
        assert!(verdict(&q, &Response::Choice(1)));
        assert!(!verdict(&q, &Response::Choice(0)));
        assert!(!verdict(&q, &Response::Choice(2)));
    }

    #[test]
    fn true_false_compares_booleans() {
        let q = question(QuestionBody::TrueFalse {
            correct_answer: false,
        });
        assert!(verdict(&q, &Response::Boolean(false)));
        assert!(!verdict(&q, &Response::Boolean(true)));
    }

    #[test]
    fn fill_in_the_blank_is_trimmed_exact_and_case_sensitive() {
        let q = question(QuestionBody::FillInTheBlank {
            correct_answer: "Paris|paris ".to_string(),
        });
        assert!(verdict(&q, &Response::Text("paris".into())));
        assert!(verdict(&q, &Response::Text(" Paris ".into())));
        assert!(!verdict(&q, &Response::Text("PARIS".into())));
        assert!(!verdict(&q, &Response::Text("pariss".into())));
    }

    #[test]
    fn short_answer_accepts_containment() {
        let q = question(QuestionBody::ShortAnswer {
            correct_answer: "النيل|الفرات".to_string(),
        });
        assert!(verdict(&q, &Response::Text("يمر نهر النيل بمصر".into())));
        assert!(verdict(&q, &Response::Text("الفرات".into())));
        assert!(!verdict(&q, &Response::Text("الأمازون".into())));
    }

    #[test]
    fn ordering_requires_authored_sequence() {
        let q = question(QuestionBody::Ordering {
            items: vec![media("X"), media("Y"), media("Z")],
        });
        assert!(verdict(&q, &Response::Order(vec![0, 1, 2])));
        assert!(!verdict(&q, &Response::Order(vec![1, 0, 2])));
        assert!(!verdict(&q, &Response::Order(vec![0, 1])));
    }

    #[test]
    fn matching_requires_every_zone_filled_correctly() {
        let q = question(QuestionBody::Matching {
            pairs: vec![pair("a", "1"), pair("b", "2")],
        });
        assert!(verdict(&q, &Response::Placements(vec![Some(0), Some(1)])));
        assert!(!verdict(&q, &Response::Placements(vec![Some(1), Some(0)])));
        assert!(!verdict(&q, &Response::Placements(vec![Some(0), None])));
        assert!(!verdict(&q, &Response::Placements(vec![Some(0)])));
    }

    #[test]
    fn connecting_lines_need_full_correct_wiring() {
        let q = question(QuestionBody::ConnectingLines {
            pairs: vec![pair("a", "1"), pair("b", "2")],
        });
        assert!(verdict(&q, &Response::Connections(vec![(0, 0), (1, 1)])));
        assert!(!verdict(&q, &Response::Connections(vec![(0, 1), (1, 0)])));
        assert!(!verdict(&q, &Response::Connections(vec![(0, 0)])));
    }

    #[test]
    fn classification_needs_empty_pool_and_matching_zones() {
        let q = question(QuestionBody::Classification {
            groups: vec![
                Group {
                    id: "g1".into(),
                    text: "أ".into(),
                },
                Group {
                    id: "g2".into(),
                    text: "ب".into(),
                },
            ],
            items: vec![
                ClassItem {
                    content: media("m"),
                    group_id: "g1".into(),
                },
                ClassItem {
                    content: media("n"),
                    group_id: "g2".into(),
                },
            ],
        });
        let all_right = Response::Buckets {
            pool: vec![],
            placed: vec![(0, "g1".into()), (1, "g2".into())],
        };
        assert!(verdict(&q, &all_right));

        // one item in the wrong zone fails even with an empty pool
        let one_wrong = Response::Buckets {
            pool: vec![],
            placed: vec![(0, "g2".into()), (1, "g2".into())],
        };
        assert!(!verdict(&q, &one_wrong));

        // leftover pool items fail even if everything placed is right
        let leftover = Response::Buckets {
            pool: vec![1],
            placed: vec![(0, "g1".into())],
        };
        assert!(!verdict(&q, &leftover));
    }

    #[test]
    fn item_without_home_group_is_never_correct() {
        let q = question(QuestionBody::Classification {
            groups: vec![Group {
                id: "g1".into(),
                text: "أ".into(),
            }],
            items: vec![ClassItem {
                content: media("orphan"),
                group_id: String::new(),
            }],
        });
        let placed = Response::Buckets {
            pool: vec![],
            placed: vec![(0, String::new())],
        };
        assert!(!verdict(&q, &placed));
    }

    #[test]
    fn skip_and_shape_mismatch_are_incorrect() {
        let q = question(QuestionBody::TrueFalse {
            correct_answer: true,
        });
        assert!(!verdict(&q, &Response::Skip));
        assert!(!verdict(&q, &Response::Choice(0)));
    }

    #[test]
    fn shuffled_indices_is_a_permutation() {
        for len in [0, 1, 2, 7, 40] {
            let mut shuffled = shuffled_indices(len);
            shuffled.sort_unstable();
            let expected: Vec<usize> = (0..len).collect();
            assert_eq!(shuffled, expected);
        }
    }

    #[test]
    fn session_locks_after_first_commit() {
        let mut session = QuizSession::new(3);
        assert!(session.commit(0, true));
        assert!(!session.commit(0, false));
        assert_eq!(session.score(), 1);
        assert!(!session.is_answered(1));
    }

    #[test]
    fn session_scoring_and_threshold() {
        let mut session = QuizSession::new(5);
        for i in 0..4 {
            session.commit(i, true);
        }
        session.commit(4, false);
        assert_eq!(session.score(), 4);
        assert_eq!(session.percentage(), 80);
        assert!(session.passed());

        let mut low = QuizSession::new(5);
        low.commit(0, true);
        assert!(!low.passed());
    }

    #[test]
    fn session_navigation_clamps_at_both_ends() {
        let mut session = QuizSession::new(2);
        assert!(!session.retreat());
        assert!(session.advance());
        assert!(!session.advance());
        assert_eq!(session.current(), 1);
    }
}
