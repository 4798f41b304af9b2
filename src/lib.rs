pub mod libwaraqa;

pub use libwaraqa::config::WorksheetConfig;
pub use libwaraqa::grade::{Response, QuizSession, PASS_PERCENTAGE};
pub use libwaraqa::numerals::NumeralMode;
pub use libwaraqa::question::{Question, QuestionBody, QuestionKind};
pub use libwaraqa::render::Variant;
pub use libwaraqa::store::QuestionStore;
