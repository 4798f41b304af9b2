pub mod html;
pub mod quiz;
pub mod runtime;
pub mod worksheet;

use crate::libwaraqa::config::WorksheetConfig;
use crate::libwaraqa::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Worksheet,
    Interactive,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Worksheet => "worksheet",
            Variant::Interactive => "interactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Variant> {
        match s {
            "worksheet" => Some(Variant::Worksheet),
            "interactive" | "quiz" => Some(Variant::Interactive),
            _ => None,
        }
    }
}

/// Turns a question snapshot plus config into one self-contained HTML
/// document. Never fails; an empty question list yields a valid, empty
/// document.
pub fn generate(questions: &[Question], config: &WorksheetConfig, variant: Variant) -> String {
    match variant {
        Variant::Worksheet => worksheet::generate(questions, config),
        Variant::Interactive => quiz::generate(questions, config),
    }
}
