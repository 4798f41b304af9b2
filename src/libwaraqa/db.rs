use log::{debug, error, info, warn};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::libwaraqa::config::WorksheetConfig;
use crate::libwaraqa::question::Question;
use crate::libwaraqa::sanitize;

const STATE_KEY: &str = "currentState";
const CONFIG_KEY: &str = "worksheetConfig";

/// The persisted editor snapshot: the question list plus the selection
/// cursor, stored as one opaque JSON blob. Tolerance on read is the
/// sanitizer's job, not the schema's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub questions: Vec<Question>,
    pub current_question_index: usize,
}

pub fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open_in_memory()?;
    let db = init_db(db)?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            Ok(db)
        }
        Err(err) => {
            warn!("Failed to create database file: {}", err);
            close_db(db)?;
            Err(err)
        }
    }
}

pub fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    ensure_tables(&db)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    match connection.close() {
        Ok(_) => Ok(()),
        Err((conn, _err)) => {
            error!("[DB] Cannot close connection. Retrying 1/2...");
            match conn.close() {
                Ok(_) => Ok(()),
                Err((conn2, _err)) => {
                    error!("[DB] Cannot close connection. Retrying 2/2...");
                    match conn2.close() {
                        Ok(_) => Ok(()),
                        Err(_) => panic!("[DB] Cannot close connection! Aborting."),
                    }
                }
            }
        }
    }
}

pub fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute(
        "CREATE TABLE State (
              key TEXT NOT NULL PRIMARY KEY,
              value TEXT NOT NULL
            )",
        (),
    )?;
    info!("[DB INIT] Created table State");
    conn.execute(
        "CREATE TABLE Config (
              key TEXT NOT NULL PRIMARY KEY,
              value TEXT NOT NULL
            )",
        (),
    )?;
    info!("[DB INIT] Created table Config");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}

fn ensure_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS State (key TEXT NOT NULL PRIMARY KEY, value TEXT NOT NULL)",
        (),
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Config (key TEXT NOT NULL PRIMARY KEY, value TEXT NOT NULL)",
        (),
    )?;
    Ok(())
}

pub fn save_state(conn: &Connection, state: &EditorState) -> Result<()> {
    let blob = serde_json::to_string(state).expect("editor state serializes");
    match conn.execute(
        "INSERT INTO State(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![STATE_KEY, blob],
    ) {
        Ok(_) => {
            debug!("[DB] Saved editor state ({} questions)", state.questions.len());
            Ok(())
        }
        Err(err) => {
            error!("[DB] Error while saving editor state: {:?}", err);
            Err(err)
        }
    }
}

/// Loads and sanitizes the persisted editor state. `None` when nothing was
/// ever saved or the blob is beyond rescue; the caller falls back to a fresh
/// single-placeholder store rather than failing.
pub fn load_state(conn: &Connection) -> Result<Option<(Vec<Question>, usize)>> {
    let blob: Option<String> = conn
        .query_row(
            "SELECT value FROM State WHERE key = ?1",
            params![STATE_KEY],
            |row| row.get(0),
        )
        .optional()?;
    let Some(blob) = blob else {
        return Ok(None);
    };
    let raw: Value = match serde_json::from_str(&blob) {
        Ok(v) => v,
        Err(err) => {
            warn!("[DB] Stored editor state is not JSON: {}", err);
            return Ok(None);
        }
    };
    let questions: Vec<Question> = raw
        .get("questions")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(sanitize::sanitize).collect())
        .unwrap_or_default();
    if questions.is_empty() {
        return Ok(None);
    }
    let index = raw
        .get("currentQuestionIndex")
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize;
    Ok(Some((questions, index)))
}

pub fn clear_state(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM State WHERE key = ?1", params![STATE_KEY])?;
    debug!("[DB] Cleared editor state");
    Ok(())
}

pub fn save_config(conn: &Connection, config: &WorksheetConfig) -> Result<()> {
    let blob = serde_json::to_string(config).expect("config serializes");
    conn.execute(
        "INSERT INTO Config(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![CONFIG_KEY, blob],
    )?;
    debug!("[DB] Saved worksheet config");
    Ok(())
}

pub fn load_config(conn: &Connection) -> Result<WorksheetConfig> {
    let blob: Option<String> = conn
        .query_row(
            "SELECT value FROM Config WHERE key = ?1",
            params![CONFIG_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(blob
        .and_then(|b| match serde_json::from_str(&b) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("[DB] Stored config is malformed, using defaults: {}", err);
                None
            }
        })
        .unwrap_or_default())
}

pub fn clear_config(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM Config WHERE key = ?1", params![CONFIG_KEY])?;
    debug!("[DB] Cleared worksheet config");
    Ok(())
}

/// Coalesces bursts of store mutations into one write: every mark resets a
/// 500 ms deadline and replaces the pending snapshot (last write wins).
/// Callers drive it with `poll` from their loop and `flush` on shutdown. A
/// failed write only logs; the in-memory state stays authoritative and the
/// next mutation retries.
pub struct DebouncedWriter {
    delay: Duration,
    pending: Option<EditorState>,
    due: Option<Instant>,
}

impl DebouncedWriter {
    pub fn new(delay: Duration) -> DebouncedWriter {
        DebouncedWriter {
            delay,
            pending: None,
            due: None,
        }
    }

    pub fn mark(&mut self, state: EditorState) {
        self.pending = Some(state);
        self.due = Some(Instant::now() + self.delay);
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, conn: &Connection) {
        if let Some(due) = self.due {
            if Instant::now() >= due {
                self.flush(conn);
            }
        }
    }

    pub fn flush(&mut self, conn: &Connection) {
        if let Some(state) = self.pending.take() {
            self.due = None;
            if let Err(err) = save_state(conn, &state) {
                warn!("[DB] Deferred save failed, keeping memory authoritative: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libwaraqa::numerals::NumeralMode;

    fn memory_db() -> Connection {
        init_db(Connection::open_in_memory().expect("in-memory db opens")).expect("tables create")
    }

    #[test]
    fn state_roundtrips_through_sanitizer() {
        let conn = memory_db();
        assert!(load_state(&conn).expect("load works").is_none());

        let state = EditorState {
            questions: vec![sanitize::placeholder()],
            current_question_index: 0,
        };
        save_state(&conn, &state).expect("save works");
        let (questions, index) = load_state(&conn)
            .expect("load works")
            .expect("state present");
        assert_eq!(questions, state.questions);
        assert_eq!(index, 0);
    }

    #[test]
    fn corrupt_state_blob_reads_as_absent() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO State(key, value) VALUES (?1, ?2)",
            params![STATE_KEY, "{not json"],
        )
        .expect("insert works");
        assert!(load_state(&conn).expect("load works").is_none());
    }

    #[test]
    fn config_roundtrip_and_clear() {
        let conn = memory_db();
        let config = WorksheetConfig {
            title: "اختبار".into(),
            numeral_type: NumeralMode::Western,
            use_timer: true,
            ..WorksheetConfig::default()
        };
        save_config(&conn, &config).expect("save works");
        assert_eq!(load_config(&conn).expect("load works"), config);

        clear_config(&conn).expect("clear works");
        assert_eq!(
            load_config(&conn).expect("load works"),
            WorksheetConfig::default()
        );
    }

    #[test]
    fn writer_coalesces_and_last_write_wins() {
        let conn = memory_db();
        let mut writer = DebouncedWriter::new(Duration::from_millis(500));
        writer.mark(EditorState {
            questions: vec![sanitize::placeholder()],
            current_question_index: 0,
        });
        let two = EditorState {
            questions: vec![sanitize::placeholder(), sanitize::placeholder()],
            current_question_index: 1,
        };
        writer.mark(two.clone());
        assert!(writer.is_dirty());

        // deadline not reached: nothing written yet
        writer.poll(&conn);
        assert!(load_state(&conn).expect("load works").is_none());

        writer.flush(&conn);
        assert!(!writer.is_dirty());
        let (questions, index) = load_state(&conn)
            .expect("load works")
            .expect("state present");
        assert_eq!(questions.len(), 2);
        assert_eq!(index, 1);
    }
}
