use serde_json::json;

use waraqa::libwaraqa::config::WorksheetConfig;
use waraqa::libwaraqa::numerals::NumeralMode;
use waraqa::libwaraqa::question::Question;
use waraqa::libwaraqa::render::runtime::RUNTIME_JS;
use waraqa::libwaraqa::render::{generate, Variant};
use waraqa::libwaraqa::sanitize::sanitize;

fn sample_questions() -> Vec<Question> {
    [
        json!({
            "type": "multiple-choice",
            "question": {"text": "ما ناتج 2 + 2؟"},
            "options": [{"text": "3"}, {"text": "4"}, {"text": "5"}],
            "correct": 1
        }),
        json!({
            "type": "true-false",
            "question": {"text": "الأرض كروية."},
            "correctAnswer": true
        }),
        json!({
            "type": "fill-in-the-blank",
            "question": {"text": "عاصمة فرنسا هي ..."},
            "correctAnswer": "باريس|Paris"
        }),
        json!({
            "type": "short-answer",
            "question": {"text": "اذكر نهراً في مصر."},
            "correctAnswer": "النيل"
        }),
        json!({
            "type": "matching",
            "question": {"text": "طابق بين البلد والعاصمة."},
            "pairs": [
                {"prompt": {"text": "مصر"}, "answer": {"text": "القاهرة"}},
                {"prompt": {"text": "العراق"}, "answer": {"text": "بغداد"}}
            ]
        }),
        json!({
            "type": "connecting-lines",
            "question": {"text": "صل الكلمة بضدها."},
            "pairs": [
                {"prompt": {"text": "كبير"}, "answer": {"text": "صغير"}},
                {"prompt": {"text": "طويل"}, "answer": {"text": "قصير"}}
            ]
        }),
        json!({
            "type": "ordering",
            "question": {"text": "رتب خطوات الوضوء."},
            "items": ["النية", "غسل اليدين", "المضمضة"]
        }),
        json!({
            "type": "classification",
            "question": {"text": "صنف الكلمات."},
            "groups": [{"id": "g-nouns", "text": "أسماء"}, {"id": "g-verbs", "text": "أفعال"}],
            "items": [
                {"text": "كتاب", "groupId": "g-nouns"},
                {"text": "كتب", "groupId": "g-verbs"}
            ]
        }),
    ]
    .iter()
    .map(sanitize)
    .collect()
}

#[test]
fn worksheet_with_two_questions_and_no_timer() {
    let questions: Vec<Question> = sample_questions().into_iter().take(2).collect();
    let config = WorksheetConfig {
        use_timer: false,
        ..WorksheetConfig::default()
    };
    let doc = generate(&questions, &config, Variant::Worksheet);
    assert_eq!(
        doc.matches("class=\"question-block\"").count(),
        2,
        "exactly two question blocks"
    );
    assert!(
        !doc.contains("id=\"worksheet-timer\""),
        "no timer element when the timer is off"
    );
}

#[test]
fn both_targets_embed_the_same_runtime() {
    let questions = sample_questions();
    let config = WorksheetConfig::default();
    let worksheet = generate(&questions, &config, Variant::Worksheet);
    let quiz = generate(&questions, &config, Variant::Interactive);
    assert!(worksheet.contains(RUNTIME_JS), "worksheet embeds the runtime verbatim");
    assert!(quiz.contains(RUNTIME_JS), "quiz embeds the runtime verbatim");
    assert_eq!(worksheet.matches("function makeRuntime").count(), 1);
    assert_eq!(quiz.matches("function makeRuntime").count(), 1);
}

#[test]
fn worksheet_renders_a_body_for_every_type() {
    let doc = generate(
        &sample_questions(),
        &WorksheetConfig::default(),
        Variant::Worksheet,
    );
    for marker in [
        "mc-option",
        "tf-option",
        "fill-blank-input",
        "short-answer-input",
        "matching-container",
        "connecting-container",
        "ordering-container",
        "classification-container",
    ] {
        assert!(doc.contains(marker), "worksheet lacks a {} body", marker);
    }
    assert_eq!(doc.matches("class=\"question-block\"").count(), 8);
}

#[test]
fn eastern_numerals_in_text_but_not_attributes() {
    let doc = generate(
        &sample_questions(),
        &WorksheetConfig::default(),
        Variant::Worksheet,
    );
    assert!(doc.contains("السؤال ١"), "question numbers use eastern digits");
    // shuffle bookkeeping stays ASCII regardless of numeral mode
    assert!(doc.contains("data-original-index=\"2\""));
    assert!(!doc.contains("data-original-index=\"٢\""));
}

#[test]
fn western_mode_keeps_ascii_digits() {
    let config = WorksheetConfig {
        numeral_type: NumeralMode::Western,
        ..WorksheetConfig::default()
    };
    let doc = generate(&sample_questions(), &config, Variant::Worksheet);
    assert!(doc.contains("السؤال 1"));
}

#[test]
fn empty_question_list_is_not_an_error() {
    let config = WorksheetConfig::default();
    for variant in [Variant::Worksheet, Variant::Interactive] {
        let doc = generate(&[], &config, variant);
        assert!(doc.starts_with("<!DOCTYPE html>"), "{:?}", variant);
        assert!(doc.ends_with("</html>"), "{:?}", variant);
    }
}

#[test]
fn quiz_embeds_question_snapshot_and_timing() {
    let config = WorksheetConfig {
        title: "مراجعة الوحدة الأولى".into(),
        question_time: Some(60),
        ..WorksheetConfig::default()
    };
    let doc = generate(&sample_questions(), &config, Variant::Interactive);
    assert!(doc.contains("questionTime: 60"));
    assert!(doc.contains("مراجعة الوحدة الأولى"));
    assert!(doc.contains("\"correctAnswer\":\"باريس|Paris\""));
    assert!(doc.contains("g-nouns"));
}

#[test]
fn variant_names_parse() {
    assert_eq!(Variant::from_str("worksheet"), Some(Variant::Worksheet));
    assert_eq!(Variant::from_str("interactive"), Some(Variant::Interactive));
    assert_eq!(Variant::from_str("quiz"), Some(Variant::Interactive));
    assert_eq!(Variant::from_str("pdf"), None);
}
