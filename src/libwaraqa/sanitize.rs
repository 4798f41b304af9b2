use log::debug;
use rand::Rng;
use serde_json::Value;

use crate::libwaraqa::question::{
    ClassItem, Group, MediaContent, Pair, Question, QuestionBody, ReadingContent,
};

/// Normalizes an arbitrary JSON value into a well-formed [`Question`].
///
/// Never fails: anything unrecognizable collapses to the multiple-choice
/// placeholder. Applying the function to its own output yields a
/// structurally identical question.
pub fn sanitize(raw: &Value) -> Question {
    let kind = raw.get("type").and_then(Value::as_str);

    let base = |body: QuestionBody| Question {
        reading: reading_content(raw.get("reading")),
        question: media_content(raw.get("question")),
        feedback: string_or_default(raw.get("feedback")),
        body,
    };

    match kind.unwrap_or("multiple-choice") {
        "multiple-choice" => base(QuestionBody::MultipleChoice {
            options: array(raw.get("options"))
                .iter()
                .map(|v| media_content(Some(v)))
                .collect(),
            correct: index_or_zero(raw.get("correct")),
        }),
        "fill-in-the-blank" => base(QuestionBody::FillInTheBlank {
            correct_answer: string_or_default(raw.get("correctAnswer")),
        }),
        "true-false" => base(QuestionBody::TrueFalse {
            // anything that is not literally `false` counts as true
            correct_answer: raw.get("correctAnswer") != Some(&Value::Bool(false)),
        }),
        "short-answer" => base(QuestionBody::ShortAnswer {
            correct_answer: string_or_default(raw.get("correctAnswer")),
        }),
        "matching" => base(QuestionBody::Matching { pairs: pairs(raw) }),
        "connecting-lines" => base(QuestionBody::ConnectingLines { pairs: pairs(raw) }),
        "ordering" => base(QuestionBody::Ordering {
            items: array(raw.get("items"))
                .iter()
                .map(|v| match v {
                    // legacy exports stored ordering items as bare strings
                    Value::String(s) => MediaContent {
                        text: s.clone(),
                        image: None,
                    },
                    other => media_content(Some(other)),
                })
                .collect(),
        }),
        "classification" => base(QuestionBody::Classification {
            groups: array(raw.get("groups"))
                .iter()
                .enumerate()
                .map(|(i, g)| Group {
                    id: match g.get("id").and_then(Value::as_str) {
                        Some(id) if !id.is_empty() => id.to_string(),
                        _ => synthetic_group_id(i),
                    },
                    text: string_or_default(g.get("text")),
                })
                .collect(),
            items: array(raw.get("items"))
                .iter()
                .map(|v| ClassItem {
                    content: media_content(Some(v)),
                    group_id: string_or_default(v.get("groupId")),
                })
                .collect(),
        }),
        other => {
            debug!("[Sanitize] Unknown question type {:?}, using placeholder", other);
            placeholder()
        }
    }
}

/// The question every empty store starts from: a multiple-choice shell with
/// two blank options.
pub fn placeholder() -> Question {
    Question {
        reading: ReadingContent::empty(),
        question: MediaContent::empty(),
        feedback: String::new(),
        body: QuestionBody::MultipleChoice {
            options: vec![MediaContent::empty(), MediaContent::empty()],
            correct: 0,
        },
    }
}

fn media_content(v: Option<&Value>) -> MediaContent {
    MediaContent {
        text: string_or_default(v.and_then(|v| v.get("text"))),
        image: data_uri(v.and_then(|v| v.get("image"))),
    }
}

fn reading_content(v: Option<&Value>) -> ReadingContent {
    ReadingContent {
        text: string_or_default(v.and_then(|v| v.get("text"))),
        image: data_uri(v.and_then(|v| v.get("image"))),
        audio: data_uri(v.and_then(|v| v.get("audio"))),
    }
}

/// Matching questions predate the `pairs` field: old records carry parallel
/// `prompts`/`answers` arrays. Those migrate only when `pairs` is absent or
/// empty; a populated `pairs` wins over whatever the legacy fields say.
fn pairs(raw: &Value) -> Vec<Pair> {
    let explicit = array(raw.get("pairs"));
    if !explicit.is_empty() {
        return explicit
            .iter()
            .map(|p| Pair {
                prompt: media_content(p.get("prompt")),
                answer: media_content(p.get("answer")),
            })
            .collect();
    }

    let prompts = array(raw.get("prompts"));
    let answers = array(raw.get("answers"));
    prompts
        .iter()
        .enumerate()
        .map(|(i, prompt)| Pair {
            prompt: media_content(Some(prompt)),
            answer: media_content(answers.get(i)),
        })
        .collect()
}

fn array(v: Option<&Value>) -> &[Value] {
    v.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn string_or_default(v: Option<&Value>) -> String {
    v.and_then(Value::as_str).unwrap_or("").to_string()
}

fn data_uri(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn index_or_zero(v: Option<&Value>) -> usize {
    v.and_then(Value::as_u64).unwrap_or(0) as usize
}

fn synthetic_group_id(index: usize) -> String {
    format!("group-{}-{:08x}", index, rand::rng().random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resanitize(q: &Question) -> Question {
        sanitize(&serde_json::to_value(q).expect("question serializes"))
    }

    #[test]
    fn unknown_type_becomes_placeholder() {
        let q = sanitize(&json!({"type": "essay", "question": {"text": "lost"}}));
        assert_eq!(q, placeholder());
    }

    #[test]
    fn non_object_input_yields_a_bare_multiple_choice() {
        let q = sanitize(&json!(42));
        match q.body {
            QuestionBody::MultipleChoice { ref options, correct } => {
                assert!(options.is_empty());
                assert_eq!(correct, 0);
            }
            _ => panic!("expected multiple-choice"),
        }
        assert!(q.is_blank_placeholder());
    }

    #[test]
    fn missing_type_defaults_to_multiple_choice_keeping_fields() {
        let q = sanitize(&json!({
            "question": {"text": "ما العاصمة؟"},
            "options": [{"text": "الرياض"}, {"text": "جدة"}],
            "correct": 1
        }));
        assert_eq!(q.question.text, "ما العاصمة؟");
        match q.body {
            QuestionBody::MultipleChoice { ref options, correct } => {
                assert_eq!(options.len(), 2);
                assert_eq!(correct, 1);
            }
            _ => panic!("expected multiple-choice"),
        }
    }

    #[test]
    fn negative_or_missing_correct_coerces_to_zero() {
        let q = sanitize(&json!({"type": "multiple-choice", "correct": -3}));
        match q.body {
            QuestionBody::MultipleChoice { correct, .. } => assert_eq!(correct, 0),
            _ => panic!("expected multiple-choice"),
        }
    }

    #[test]
    fn true_false_only_literal_false_is_false() {
        for (raw, expected) in [
            (json!({"type": "true-false", "correctAnswer": false}), false),
            (json!({"type": "true-false", "correctAnswer": true}), true),
            (json!({"type": "true-false"}), true),
            (json!({"type": "true-false", "correctAnswer": "no"}), true),
        ] {
            match sanitize(&raw).body {
                QuestionBody::TrueFalse { correct_answer } => assert_eq!(correct_answer, expected),
                _ => panic!("expected true-false"),
            }
        }
    }

    #[test]
    fn legacy_prompt_answer_arrays_migrate_to_pairs() {
        let q = sanitize(&json!({
            "type": "matching",
            "prompts": [{"text": "أ"}, {"text": "ب"}],
            "answers": [{"text": "1"}]
        }));
        match q.body {
            QuestionBody::Matching { ref pairs } => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].prompt.text, "أ");
                assert_eq!(pairs[0].answer.text, "1");
                assert_eq!(pairs[1].answer.text, "");
            }
            _ => panic!("expected matching"),
        }
    }

    #[test]
    fn populated_pairs_win_over_legacy_fields() {
        let q = sanitize(&json!({
            "type": "connecting-lines",
            "prompts": [{"text": "stale"}],
            "answers": [{"text": "stale"}],
            "pairs": [{"prompt": {"text": "جديد"}, "answer": {"text": "new"}}]
        }));
        match q.body {
            QuestionBody::ConnectingLines { ref pairs } => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].prompt.text, "جديد");
            }
            _ => panic!("expected connecting-lines"),
        }
    }

    #[test]
    fn ordering_coerces_bare_strings() {
        let q = sanitize(&json!({"type": "ordering", "items": ["أولاً", {"text": "ثانياً"}]}));
        match q.body {
            QuestionBody::Ordering { ref items } => {
                assert_eq!(items[0].text, "أولاً");
                assert_eq!(items[1].text, "ثانياً");
            }
            _ => panic!("expected ordering"),
        }
    }

    #[test]
    fn classification_groups_get_synthetic_ids() {
        let q = sanitize(&json!({
            "type": "classification",
            "groups": [{"text": "حيوانات"}, {"id": "plants", "text": "نباتات"}],
            "items": [{"text": "قط", "groupId": "plants"}, {"text": "وردة"}]
        }));
        match q.body {
            QuestionBody::Classification { ref groups, ref items } => {
                assert!(groups[0].id.starts_with("group-0-"));
                assert_eq!(groups[1].id, "plants");
                assert_eq!(items[0].group_id, "plants");
                assert_eq!(items[1].group_id, "");
            }
            _ => panic!("expected classification"),
        }
    }

    #[test]
    fn sanitize_is_idempotent_for_every_kind() {
        let raws = [
            json!({"type": "multiple-choice", "options": [{"text": "a"}], "correct": 0}),
            json!({"type": "fill-in-the-blank", "correctAnswer": "x|y"}),
            json!({"type": "true-false", "correctAnswer": false}),
            json!({"type": "short-answer", "correctAnswer": "z"}),
            json!({"type": "matching", "prompts": [{"text": "p"}], "answers": [{"text": "a"}]}),
            json!({"type": "connecting-lines", "pairs": [{"prompt": {}, "answer": {}}]}),
            json!({"type": "ordering", "items": ["one", "two"]}),
            json!({"type": "classification", "groups": [{"text": "g"}], "items": [{"text": "i"}]}),
        ];
        for raw in &raws {
            let once = sanitize(raw);
            assert_eq!(resanitize(&once), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn blank_image_strings_become_none() {
        let q = sanitize(&json!({
            "type": "multiple-choice",
            "question": {"text": "q", "image": ""},
            "options": []
        }));
        assert_eq!(q.question.image, None);
    }
}
