use colored::Colorize;
use log::debug;
use text_io::read;

use waraqa::libwaraqa::grade::{shuffled_indices, verdict, QuizSession, Response};
use waraqa::libwaraqa::question::{strip_html, MediaContent, Question, QuestionBody};

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    DontKnow,
    Quit,
}

impl Choice {
    fn from_str(option_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if num >= 1 && num <= option_count => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", option_count).bright_red()
                    );
                    Choice::DontKnow
                }
                Err(_) => Choice::DontKnow,
            },
        }
    }
}

fn read_line() -> String {
    let line: String = read!("{}\n");
    line
}

fn label(content: &MediaContent) -> String {
    let text = strip_html(&content.text).trim().to_string();
    match (&content.image, text.is_empty()) {
        (Some(_), true) => "(image)".to_string(),
        (Some(_), false) => format!("{} (image)", text),
        (None, _) => text,
    }
}

fn print_options(leading: &str, labels: &[String]) {
    let indent = " ".repeat(leading.len());
    for (i, text) in labels.iter().enumerate() {
        println!("{}{}. {}", indent, format!("{}", i + 1).bold(), text);
    }
}

/// Plays the question list in the terminal with the same grading engine the
/// exported documents embed. Returns the finished session, or `None` when
/// the user quit early.
pub fn play_loop(questions: &[Question]) -> Option<QuizSession> {
    let mut session = QuizSession::new(questions.len());

    for (idx, question) in questions.iter().enumerate() {
        let leading = format!("{}/{}. ", idx + 1, questions.len());
        println!(
            "{}{}",
            leading.cyan(),
            strip_html(&question.question.text)
                .trim()
                .black()
                .bold()
                .on_white()
        );
        let reading = strip_html(&question.reading.text);
        if !reading.trim().is_empty() {
            println!("{}", reading.trim().italic());
        }

        let response = match prompt_response(&leading, question) {
            Some(response) => response,
            None => {
                println!("{}", "Quitting Early!".cyan());
                return None;
            }
        };
        debug!("response: {:?}", response);

        let correct = verdict(question, &response);
        session.commit(idx, correct);
        if correct {
            println!("{}", "Correct!".bright_green());
        } else {
            println!("{}", "Incorrect!".bright_red());
        }
        if !question.feedback.trim().is_empty() {
            println!("{}", strip_html(&question.feedback).trim().yellow());
        }
        session.advance();
    }

    println!(
        "{}",
        format!(
            "==========> Score: {}/{} ({}%) <==========",
            session.score(),
            session.total(),
            session.percentage()
        )
        .cyan()
    );
    if session.passed() {
        println!(
            "{}",
            "Passed! This play-through earns a certificate.".bright_green()
        );
    } else {
        println!("{}", "Below the 80% certificate threshold.".yellow());
    }
    Some(session)
}

/// Asks for this question's arrangement and maps it back to original
/// indices. `None` means the user quit.
fn prompt_response(leading: &str, question: &Question) -> Option<Response> {
    match &question.body {
        QuestionBody::MultipleChoice { options, .. } => {
            let order = shuffled_indices(options.len());
            let labels: Vec<String> = order.iter().map(|&i| label(&options[i])).collect();
            print_options(leading, &labels);
            print!(
                "{} ",
                "Answer (number, q to quit, anything else if you don't know):".cyan()
            );
            match Choice::from_str(order.len(), &read_line()) {
                Choice::Quit => None,
                Choice::DontKnow => Some(Response::Skip),
                Choice::Option(display) => Some(Response::Choice(order[display])),
            }
        }
        QuestionBody::TrueFalse { .. } => {
            print!("{} ", "True or false? (t/f, q to quit):".cyan());
            match read_line().trim() {
                "q" => None,
                "t" => Some(Response::Boolean(true)),
                "f" => Some(Response::Boolean(false)),
                _ => Some(Response::Skip),
            }
        }
        QuestionBody::FillInTheBlank { .. } | QuestionBody::ShortAnswer { .. } => {
            print!("{} ", "Your answer (q to quit):".cyan());
            match read_line() {
                quit if quit.trim() == "q" => None,
                text => Some(Response::Text(text)),
            }
        }
        QuestionBody::Ordering { items } => {
            let order = shuffled_indices(items.len());
            let labels: Vec<String> = order.iter().map(|&i| label(&items[i])).collect();
            print_options(leading, &labels);
            print!(
                "{} ",
                "Enter the numbers in the correct order (e.g. 2 3 1, q to quit):".cyan()
            );
            let picks = read_numbers(items.len())?;
            Some(match picks {
                Some(picks) if picks.len() == items.len() => {
                    Response::Order(picks.iter().map(|&p| order[p]).collect())
                }
                _ => Response::Skip,
            })
        }
        QuestionBody::Matching { pairs } | QuestionBody::ConnectingLines { pairs } => {
            let order = shuffled_indices(pairs.len());
            let labels: Vec<String> = order.iter().map(|&i| label(&pairs[i].answer)).collect();
            print_options(leading, &labels);
            let connecting = matches!(question.body, QuestionBody::ConnectingLines { .. });
            let mut placements: Vec<Option<usize>> = vec![None; pairs.len()];
            let mut connections: Vec<(usize, usize)> = Vec::new();
            for (zone, pair) in pairs.iter().enumerate() {
                print!(
                    "{} ",
                    format!("Match for \"{}\" (number, q to quit):", label(&pair.prompt)).cyan()
                );
                match Choice::from_str(order.len(), &read_line()) {
                    Choice::Quit => return None,
                    Choice::DontKnow => {}
                    Choice::Option(display) => {
                        placements[zone] = Some(order[display]);
                        connections.push((zone, order[display]));
                    }
                }
            }
            Some(if connecting {
                Response::Connections(connections)
            } else {
                Response::Placements(placements)
            })
        }
        QuestionBody::Classification { groups, items } => {
            let group_labels: Vec<String> = groups
                .iter()
                .map(|g| strip_html(&g.text).trim().to_string())
                .collect();
            print_options(leading, &group_labels);
            let mut pool = Vec::new();
            let mut placed = Vec::new();
            for item_index in shuffled_indices(items.len()) {
                print!(
                    "{} ",
                    format!(
                        "Group for \"{}\" (number, q to quit):",
                        label(&items[item_index].content)
                    )
                    .cyan()
                );
                match Choice::from_str(groups.len(), &read_line()) {
                    Choice::Quit => return None,
                    Choice::DontKnow => pool.push(item_index),
                    Choice::Option(group) => {
                        placed.push((item_index, groups[group].id.clone()));
                    }
                }
            }
            Some(Response::Buckets { pool, placed })
        }
    }
}

/// Reads a whitespace-separated list of 1-based display numbers. Outer
/// `None` means quit; inner `None` means the input was not usable.
fn read_numbers(count: usize) -> Option<Option<Vec<usize>>> {
    let line = read_line();
    if line.trim() == "q" {
        return None;
    }
    let mut picks = Vec::new();
    for token in line.split_whitespace() {
        match token.parse::<usize>() {
            Ok(num) if num >= 1 && num <= count && !picks.contains(&(num - 1)) => {
                picks.push(num - 1)
            }
            _ => return Some(None),
        }
    }
    Some(Some(picks))
}
