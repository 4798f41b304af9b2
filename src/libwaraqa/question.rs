use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl MediaContent {
    pub fn empty() -> MediaContent {
        MediaContent {
            text: String::new(),
            image: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        strip_html(&self.text).trim().is_empty() && self.image.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl ReadingContent {
    pub fn empty() -> ReadingContent {
        ReadingContent {
            text: String::new(),
            image: None,
            audio: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        strip_html(&self.text).trim().is_empty() && self.image.is_none() && self.audio.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub prompt: MediaContent,
    pub answer: MediaContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassItem {
    #[serde(flatten)]
    pub content: MediaContent,
    #[serde(rename = "groupId", default)]
    pub group_id: String,
}

/// One gradable unit of content. Shared fields live here; everything
/// type-specific is in the `body` variant, which carries the `type`
/// discriminator on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default = "ReadingContent::empty")]
    pub reading: ReadingContent,
    #[serde(default = "MediaContent::empty")]
    pub question: MediaContent,
    #[serde(default)]
    pub feedback: String,
    #[serde(flatten)]
    pub body: QuestionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionBody {
    MultipleChoice {
        options: Vec<MediaContent>,
        correct: usize,
    },
    FillInTheBlank {
        #[serde(rename = "correctAnswer")]
        correct_answer: String,
    },
    TrueFalse {
        #[serde(rename = "correctAnswer")]
        correct_answer: bool,
    },
    ShortAnswer {
        #[serde(rename = "correctAnswer")]
        correct_answer: String,
    },
    Matching {
        pairs: Vec<Pair>,
    },
    ConnectingLines {
        pairs: Vec<Pair>,
    },
    Ordering {
        items: Vec<MediaContent>,
    },
    Classification {
        groups: Vec<Group>,
        items: Vec<ClassItem>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    FillInTheBlank,
    TrueFalse,
    ShortAnswer,
    Matching,
    ConnectingLines,
    Ordering,
    Classification,
}

pub const ALL_KINDS: [QuestionKind; 8] = [
    QuestionKind::MultipleChoice,
    QuestionKind::FillInTheBlank,
    QuestionKind::TrueFalse,
    QuestionKind::ShortAnswer,
    QuestionKind::Matching,
    QuestionKind::ConnectingLines,
    QuestionKind::Ordering,
    QuestionKind::Classification,
];

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::FillInTheBlank => "fill-in-the-blank",
            QuestionKind::TrueFalse => "true-false",
            QuestionKind::ShortAnswer => "short-answer",
            QuestionKind::Matching => "matching",
            QuestionKind::ConnectingLines => "connecting-lines",
            QuestionKind::Ordering => "ordering",
            QuestionKind::Classification => "classification",
        }
    }

    pub fn from_str(s: &str) -> Option<QuestionKind> {
        ALL_KINDS.iter().copied().find(|k| k.as_str() == s)
    }
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::FillInTheBlank { .. } => QuestionKind::FillInTheBlank,
            QuestionBody::TrueFalse { .. } => QuestionKind::TrueFalse,
            QuestionBody::ShortAnswer { .. } => QuestionKind::ShortAnswer,
            QuestionBody::Matching { .. } => QuestionKind::Matching,
            QuestionBody::ConnectingLines { .. } => QuestionKind::ConnectingLines,
            QuestionBody::Ordering { .. } => QuestionKind::Ordering,
            QuestionBody::Classification { .. } => QuestionKind::Classification,
        }
    }

    /// A freshly added question that was never edited: no body text, no
    /// image. Imports replace such a question instead of appending after it.
    pub fn is_blank_placeholder(&self) -> bool {
        self.question.is_blank() && self.reading.is_blank()
    }
}

/// Options consumed by the external Word DocumentBuilder. The builder itself
/// lives outside this crate; only the contract is defined here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub header_text: String,
    pub include_question_numbers: bool,
    pub include_answers: bool,
    pub randomize_order_items: bool,
    pub force_rtl: bool,
    pub question_per_page: bool,
}

impl Default for ExportOptions {
    fn default() -> ExportOptions {
        ExportOptions {
            header_text: String::new(),
            include_question_numbers: true,
            include_answers: false,
            randomize_order_items: false,
            force_rtl: true,
            question_per_page: false,
        }
    }
}

/// Drops tags from an HTML fragment, keeping only its character data.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_roundtrips_with_flat_type_tag() {
        let q = Question {
            reading: ReadingContent::empty(),
            question: MediaContent {
                text: "<p>٢ + ٢ = ؟</p>".into(),
                image: None,
            },
            feedback: String::new(),
            body: QuestionBody::MultipleChoice {
                options: vec![MediaContent::empty(), MediaContent::empty()],
                correct: 1,
            },
        };
        let value = serde_json::to_value(&q).expect("question serializes");
        assert_eq!(value["type"], "multiple-choice");
        assert_eq!(value["correct"], 1);
        let back: Question = serde_json::from_value(value).expect("question deserializes");
        assert_eq!(back, q);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let q = Question {
            reading: ReadingContent::empty(),
            question: MediaContent::empty(),
            feedback: String::new(),
            body: QuestionBody::FillInTheBlank {
                correct_answer: "باريس".into(),
            },
        };
        let value = serde_json::to_value(&q).expect("question serializes");
        assert_eq!(value["type"], "fill-in-the-blank");
        assert_eq!(value["correctAnswer"], "باريس");
    }

    #[test]
    fn class_item_flattens_media_fields() {
        let json = r#"{"text": "قط", "image": null, "groupId": "g1"}"#;
        let item: ClassItem = serde_json::from_str(json).expect("class item parses");
        assert_eq!(item.content.text, "قط");
        assert_eq!(item.group_id, "g1");
    }

    #[test]
    fn export_options_carry_the_builder_contract() {
        let options = ExportOptions::default();
        assert!(options.include_question_numbers);
        assert!(options.force_rtl);
        assert!(!options.include_answers);
        let value = serde_json::to_value(&options).expect("options serialize");
        assert_eq!(value["includeAnswers"], false);
        assert_eq!(value["randomizeOrderItems"], false);
        let back: ExportOptions =
            serde_json::from_str(r#"{"headerText": "اختبار نهائي", "includeAnswers": true}"#)
                .expect("partial options parse");
        assert_eq!(back.header_text, "اختبار نهائي");
        assert!(back.include_answers);
    }

    #[test]
    fn strip_html_keeps_character_data_only() {
        assert_eq!(strip_html("<p>hello <b>world</b></p>"), "hello world");
        assert_eq!(strip_html("plain"), "plain");
        assert_eq!(strip_html("<img src=\"x\">"), "");
    }
}
