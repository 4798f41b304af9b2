use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use text_io::read;
use thiserror::Error;

use waraqa::libwaraqa::db::{self, DebouncedWriter, EditorState};
use waraqa::libwaraqa::numerals::NumeralMode;
use waraqa::libwaraqa::question::{strip_html, Question, QuestionKind};
use waraqa::libwaraqa::render::{self, Variant};
use waraqa::libwaraqa::sanitize;
use waraqa::libwaraqa::store::{QuestionStore, StoreError};

mod cli;

#[derive(Parser, Debug)]
#[command(name = "ورقة (Waraqa)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "FILE", default_value = "waraqa.db")]
    db: PathBuf,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the question list and the current selection
    List,
    /// Insert a fresh question (defaults to multiple-choice at the end)
    Add {
        #[arg(long)]
        at: Option<usize>,
        #[arg(short, long, default_value = "multiple-choice")]
        kind: String,
    },
    /// Delete a question (the sole remaining question is refused)
    Remove {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
    /// Clone a question right after itself
    Duplicate { index: usize },
    /// Reorder: move the question at FROM so it sits at TO
    Move { from: usize, to: usize },
    /// Change a question's type, re-running it through the sanitizer
    SetType { index: usize, kind: String },
    /// Select a question as current
    Select { index: usize },
    /// Import question JSON files (arrays of question objects)
    Import { files: Vec<PathBuf> },
    /// Write the (optionally picked) questions as pretty JSON
    ExportJson {
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, value_delimiter = ',')]
        pick: Vec<usize>,
    },
    /// Generate a standalone HTML document (worksheet or quiz)
    Export {
        target: String,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, value_delimiter = ',')]
        pick: Vec<usize>,
    },
    /// Play the questions in the terminal with the real grading engine
    Play,
    /// Show or change the worksheet configuration
    Config {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        footer: Option<String>,
        #[arg(long)]
        teacher_name: Option<String>,
        #[arg(long, value_name = "eastern|western")]
        numerals: Option<String>,
        #[arg(long)]
        use_timer: Option<bool>,
        #[arg(long, value_name = "MINUTES")]
        timer_duration: Option<u32>,
        #[arg(long, value_name = "SECONDS")]
        question_time: Option<u32>,
        #[arg(long)]
        show_print_button: Option<bool>,
        #[arg(long, value_name = "IMAGE")]
        logo: Option<PathBuf>,
        #[arg(long, value_name = "IMAGE")]
        seal: Option<PathBuf>,
    },
    /// Drop the saved question list and start over
    Reset {
        #[arg(short, long)]
        yes: bool,
    },
    /// Drop the saved worksheet configuration
    ClearConfig {
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
enum Error {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("cannot read or write file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unknown question type {0:?}")]
    UnknownKind(String),
    #[error("unknown export target {0:?} (expected worksheet or quiz)")]
    UnknownTarget(String),
    #[error("unknown numeral mode {0:?} (expected eastern or western)")]
    UnknownNumerals(String),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.clone())).init();

    let conn = db::create_or_open(&args.db)?;
    debug!("[DB] Database Connection Successful!");

    let mut store = match db::load_state(&conn) {
        Ok(Some((questions, index))) => QuestionStore::new(questions, index),
        Ok(None) => QuestionStore::fresh(),
        Err(err) => {
            // a broken database must never block authoring
            warn!("[Setup] Could not restore editor state: {}", err);
            QuestionStore::fresh()
        }
    };
    let mut writer = DebouncedWriter::new(Duration::from_millis(500));

    let result = run(&args.command, &conn, &mut store, &mut writer);
    writer.flush(&conn);
    finish(conn, result)
}

fn run(
    command: &Commands,
    conn: &rusqlite::Connection,
    store: &mut QuestionStore,
    writer: &mut DebouncedWriter,
) -> Result<(), Error> {
    match command {
        Commands::List => {
            for (index, question) in store.questions().iter().enumerate() {
                let marker = if index == store.current_index() { ">" } else { " " };
                let text = strip_html(&question.question.text);
                let mut preview: String = text.trim().chars().take(60).collect();
                if preview.is_empty() {
                    preview = "(blank)".to_string();
                }
                println!(
                    "{} {:>3}. {:<18} {}",
                    marker.cyan(),
                    index,
                    question.kind().as_str().bold(),
                    preview
                );
            }
        }
        Commands::Add { at, kind } => {
            let question = fresh_question(kind)?;
            store.add(question, *at);
            writer.mark(snapshot(store));
            println!(
                "{}",
                format!("Added {} question at {}.", kind, store.current_index()).green()
            );
        }
        Commands::Remove { index, yes } => {
            if store.len() <= 1 {
                // refused outright, no confirmation offered
                println!("{}", "Cannot delete the sole question!".bright_red());
                return Ok(());
            }
            if !confirm(&format!("Delete question {}?", index), *yes) {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            store.remove(*index)?;
            writer.mark(snapshot(store));
            println!("{}", format!("Removed question {}.", index).green());
        }
        Commands::Duplicate { index } => {
            store.duplicate(*index)?;
            writer.mark(snapshot(store));
            println!("{}", format!("Duplicated question {}.", index).green());
        }
        Commands::Move { from, to } => {
            store.move_question(*from, *to);
            writer.mark(snapshot(store));
            println!("{}", format!("Moved question {} to {}.", from, to).green());
        }
        Commands::SetType { index, kind } => {
            let target = QuestionKind::from_str(kind)
                .ok_or_else(|| Error::UnknownKind(kind.clone()))?;
            let question = store
                .get(*index)
                .ok_or(StoreError::OutOfBounds(*index))?;
            let mut raw = serde_json::to_value(question).expect("question serializes");
            raw["type"] = serde_json::Value::String(target.as_str().to_string());
            store.update(*index, sanitize::sanitize(&raw))?;
            writer.mark(snapshot(store));
            println!(
                "{}",
                format!("Question {} is now {}.", index, target.as_str()).green()
            );
        }
        Commands::Select { index } => {
            store.select(*index)?;
            writer.mark(snapshot(store));
        }
        Commands::Import { files } => {
            let mut incoming: Vec<Question> = Vec::new();
            for file in files {
                let count_before = incoming.len();
                match read_question_file(file) {
                    Ok(mut questions) => incoming.append(&mut questions),
                    Err(err) => {
                        warn!("[Import] {}: {}", file.display(), err);
                    }
                }
                let imported = incoming.len() - count_before;
                let line = format!("{}: {} questions", file.display(), imported);
                if imported == 0 {
                    println!("{}", line.red());
                } else {
                    println!("{}", line.green());
                }
            }
            if incoming.is_empty() {
                println!("{}", "No valid questions found.".bright_red());
                return Ok(());
            }
            println!(
                "{}",
                format!("Imported {} questions in total.", incoming.len()).green()
            );
            store.import(incoming);
            writer.mark(snapshot(store));
        }
        Commands::ExportJson { out, pick } => {
            let questions = picked(store, pick);
            let json =
                serde_json::to_string_pretty(&questions).expect("questions serialize");
            fs::write(out, json)?;
            println!(
                "{}",
                format!("Wrote {} questions to {}.", questions.len(), out.display()).green()
            );
        }
        Commands::Export { target, out, pick } => {
            let variant = Variant::from_str(target)
                .ok_or_else(|| Error::UnknownTarget(target.clone()))?;
            let config = db::load_config(conn)?;
            let questions = picked(store, pick);
            let document = render::generate(&questions, &config, variant);
            fs::write(out, document)?;
            println!(
                "{}",
                format!(
                    "Wrote {} document ({} questions) to {}.",
                    variant.as_str(),
                    questions.len(),
                    out.display()
                )
                .green()
            );
        }
        Commands::Play => {
            cli::play_loop(store.questions());
        }
        Commands::Config {
            title,
            instructions,
            footer,
            teacher_name,
            numerals,
            use_timer,
            timer_duration,
            question_time,
            show_print_button,
            logo,
            seal,
        } => {
            let mut config = db::load_config(conn)?;
            let mut changed = false;
            let mut set_string = |slot: &mut String, value: &Option<String>| {
                if let Some(value) = value {
                    *slot = value.clone();
                    changed = true;
                }
            };
            set_string(&mut config.title, title);
            set_string(&mut config.instructions, instructions);
            set_string(&mut config.footer, footer);
            set_string(&mut config.teacher_name, teacher_name);
            if let Some(mode) = numerals {
                config.numeral_type = NumeralMode::from_str(mode)
                    .ok_or_else(|| Error::UnknownNumerals(mode.clone()))?;
                changed = true;
            }
            if let Some(value) = use_timer {
                config.use_timer = *value;
                changed = true;
            }
            if let Some(minutes) = timer_duration {
                config.timer_duration = *minutes;
                changed = true;
            }
            if let Some(seconds) = question_time {
                config.question_time = Some(*seconds);
                changed = true;
            }
            if let Some(value) = show_print_button {
                config.show_print_button = *value;
                changed = true;
            }
            if let Some(path) = logo {
                config.logo = Some(image_data_uri(path)?);
                changed = true;
            }
            if let Some(path) = seal {
                config.seal = Some(image_data_uri(path)?);
                changed = true;
            }
            if changed {
                db::save_config(conn, &config)?;
                println!("{}", "Configuration saved.".green());
            } else {
                let json =
                    serde_json::to_string_pretty(&config).expect("config serializes");
                println!("{}", json);
            }
        }
        Commands::Reset { yes } => {
            if !confirm("Delete ALL questions and start over?", *yes) {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            db::clear_state(conn)?;
            *store = QuestionStore::fresh();
            writer.mark(snapshot(store));
            println!("{}", "Editor state reset.".green());
        }
        Commands::ClearConfig { yes } => {
            if !confirm("Clear the saved worksheet configuration?", *yes) {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            db::clear_config(conn)?;
            println!("{}", "Configuration cleared.".green());
        }
    }
    Ok(())
}

fn finish(conn: rusqlite::Connection, to_error: Result<(), Error>) -> Result<(), Error> {
    db::close_db(conn)?;
    to_error
}

fn snapshot(store: &QuestionStore) -> EditorState {
    EditorState {
        questions: store.questions().to_vec(),
        current_question_index: store.current_index(),
    }
}

fn fresh_question(kind: &str) -> Result<Question, Error> {
    let target =
        QuestionKind::from_str(kind).ok_or_else(|| Error::UnknownKind(kind.to_string()))?;
    Ok(match target {
        QuestionKind::MultipleChoice => sanitize::placeholder(),
        other => sanitize::sanitize(&serde_json::json!({ "type": other.as_str() })),
    })
}

fn picked(store: &QuestionStore, pick: &[usize]) -> Vec<Question> {
    if pick.is_empty() {
        return store.questions().to_vec();
    }
    pick.iter()
        .filter_map(|&index| store.get(index).cloned())
        .collect()
}

fn read_question_file(path: &Path) -> Result<Vec<Question>, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let raw: serde_json::Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    match raw.as_array() {
        Some(list) => Ok(list.iter().map(sanitize::sanitize).collect()),
        None => Err("not a JSON array of questions".to_string()),
    }
}

fn image_data_uri(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
        .as_str()
    {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/png",
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
}

fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{} [y/N] ", prompt.yellow());
    let line: String = read!("{}\n");
    matches!(line.trim(), "y" | "Y" | "yes")
}
