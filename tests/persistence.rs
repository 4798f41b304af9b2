use std::time::Duration;

use rusqlite::Connection;
use serde_json::json;

use waraqa::libwaraqa::config::WorksheetConfig;
use waraqa::libwaraqa::db::{self, DebouncedWriter, EditorState};
use waraqa::libwaraqa::numerals::NumeralMode;
use waraqa::libwaraqa::sanitize::{placeholder, sanitize};
use waraqa::libwaraqa::store::QuestionStore;

fn memory_db() -> Connection {
    db::init_db(Connection::open_in_memory().expect("in-memory db opens"))
        .expect("tables create")
}

#[test]
fn fresh_database_yields_no_state() {
    let conn = memory_db();
    assert!(db::load_state(&conn).expect("load works").is_none());
    assert_eq!(
        db::load_config(&conn).expect("load works"),
        WorksheetConfig::default()
    );
}

#[test]
fn store_roundtrips_through_the_database() {
    let conn = memory_db();
    let mut store = QuestionStore::fresh();
    store.import(vec![
        sanitize(&json!({
            "type": "fill-in-the-blank",
            "question": {"text": "س١"},
            "correctAnswer": "أ|ب"
        })),
        sanitize(&json!({
            "type": "true-false",
            "question": {"text": "س٢"},
            "correctAnswer": false
        })),
    ]);
    store.select(1).expect("select works");

    db::save_state(
        &conn,
        &EditorState {
            questions: store.questions().to_vec(),
            current_question_index: store.current_index(),
        },
    )
    .expect("save works");

    let (questions, index) = db::load_state(&conn)
        .expect("load works")
        .expect("state present");
    assert_eq!(questions, store.questions());
    assert_eq!(index, 1);

    // restoring builds an equivalent store
    let restored = QuestionStore::new(questions, index);
    assert_eq!(restored.current_index(), 1);
    assert_eq!(restored.len(), 2);
}

#[test]
fn legacy_blobs_are_sanitized_on_load() {
    let conn = memory_db();
    // a legacy matching question straight in the blob, prompts/answers style
    let blob = json!({
        "questions": [{
            "type": "matching",
            "prompts": [{"text": "أ"}, {"text": "ب"}],
            "answers": [{"text": "1"}, {"text": "2"}]
        }],
        "currentQuestionIndex": 7
    });
    conn.execute(
        "INSERT INTO State(key, value) VALUES ('currentState', ?1)",
        [blob.to_string()],
    )
    .expect("insert works");

    let (questions, index) = db::load_state(&conn)
        .expect("load works")
        .expect("state present");
    assert_eq!(questions.len(), 1);
    let value = serde_json::to_value(&questions[0]).expect("question serializes");
    assert_eq!(value["type"], "matching");
    assert_eq!(value["pairs"].as_array().expect("pairs migrated").len(), 2);

    // an out-of-range cursor is clamped by the store, not trusted
    let store = QuestionStore::new(questions, index);
    assert_eq!(store.current_index(), 0);
}

#[test]
fn deferred_writes_coalesce_to_the_last_snapshot() {
    let conn = memory_db();
    let mut writer = DebouncedWriter::new(Duration::from_millis(1));
    for n in 1..=5 {
        let questions = vec![placeholder(); n];
        writer.mark(EditorState {
            questions,
            current_question_index: n - 1,
        });
    }
    std::thread::sleep(Duration::from_millis(5));
    writer.poll(&conn);
    assert!(!writer.is_dirty());

    let (questions, index) = db::load_state(&conn)
        .expect("load works")
        .expect("state present");
    assert_eq!(questions.len(), 5, "only the last snapshot is written");
    assert_eq!(index, 4);
}

#[test]
fn config_lifecycle_load_save_clear() {
    let conn = memory_db();
    let config = WorksheetConfig {
        title: "ورقة عمل".into(),
        teacher_name: "أ. محمد".into(),
        numeral_type: NumeralMode::Western,
        use_timer: true,
        timer_duration: 45,
        question_time: Some(30),
        ..WorksheetConfig::default()
    };
    db::save_config(&conn, &config).expect("save works");
    assert_eq!(db::load_config(&conn).expect("load works"), config);

    // saving again overwrites in place
    let renamed = WorksheetConfig {
        title: "ورقة ثانية".into(),
        ..config.clone()
    };
    db::save_config(&conn, &renamed).expect("save works");
    assert_eq!(db::load_config(&conn).expect("load works"), renamed);

    db::clear_config(&conn).expect("clear works");
    assert_eq!(
        db::load_config(&conn).expect("load works"),
        WorksheetConfig::default()
    );
}
