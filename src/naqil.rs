use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use waraqa::libwaraqa::db::{self, EditorState};
use waraqa::libwaraqa::question::Question;
use waraqa::libwaraqa::sanitize;
use waraqa::libwaraqa::store::QuestionStore;

#[derive(Parser, Debug)]
#[command(name = "ناقل (Naqil)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", default_value = "waraqa.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read question JSON files into the editor database
    Import { files: Vec<PathBuf> },
    /// Write the editor's question list as a pretty JSON array
    Export { out: Option<PathBuf> },
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let conn = match db::create_or_open(&args.db) {
        Ok(d) => d,
        Err(e) => {
            error!("{}{}", "Unable to open Database: ".red(), e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Import { files } => {
            if files.is_empty() {
                error!("{}", "No files to import!".red());
                db::close_db(conn).unwrap();
                std::process::exit(1);
            }

            let mut incoming: Vec<Question> = Vec::new();
            for file in &files {
                // a file that fails to parse contributes zero questions;
                // the rest still import
                let questions = read_questions(file);
                info!(
                    "{}",
                    format!("├ {}: {} questions", file.display(), questions.len()).blue()
                );
                incoming.extend(questions);
            }

            if incoming.is_empty() {
                println!("{}", "No valid questions found.".red());
                db::close_db(conn).unwrap();
                return;
            }

            let mut store = match db::load_state(&conn) {
                Ok(Some((questions, index))) => QuestionStore::new(questions, index),
                _ => QuestionStore::fresh(),
            };
            let total = incoming.len();
            store.import(incoming);
            let state = EditorState {
                questions: store.questions().to_vec(),
                current_question_index: store.current_index(),
            };
            match db::save_state(&conn, &state) {
                Ok(_) => println!(
                    "{}",
                    format!("Imported {} questions ({} total).", total, store.len()).green()
                ),
                Err(e) => error!("{}{}", "Unable to save imported questions: ".red(), e),
            }
        }
        Commands::Export { out } => {
            let questions = match db::load_state(&conn) {
                Ok(Some((questions, _))) => questions,
                Ok(None) => {
                    println!("{}", "Nothing saved yet; exporting a fresh placeholder.".yellow());
                    vec![sanitize::placeholder()]
                }
                Err(e) => {
                    error!("{}{}", "Unable to read editor state: ".red(), e);
                    db::close_db(conn).unwrap();
                    std::process::exit(1);
                }
            };
            let json = serde_json::to_string_pretty(&questions).expect("questions serialize");
            match out {
                Some(path) => match std::fs::write(&path, json) {
                    Ok(_) => println!(
                        "{}",
                        format!("Wrote {} questions to {}.", questions.len(), path.display())
                            .green()
                    ),
                    Err(e) => error!("{}{}", "Unable to write file: ".red(), e),
                },
                None => println!("{}", json),
            }
        }
    }

    db::close_db(conn).unwrap()
}

fn read_questions(file: &PathBuf) -> Vec<Question> {
    let text = match std::fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", format!("├ ✘ {}: {}", file.display(), e).red());
            return Vec::new();
        }
    };
    let raw: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            error!("{}", format!("├ ✘ {}: Malformed JSON: {}!", file.display(), e).red());
            return Vec::new();
        }
    };
    match raw.as_array() {
        Some(list) => list.iter().map(sanitize::sanitize).collect(),
        None => {
            error!(
                "{}",
                format!("├ ✘ {}: not a JSON array of questions", file.display()).red()
            );
            Vec::new()
        }
    }
}
