use serde::{Deserialize, Serialize};

use crate::libwaraqa::grade::DEFAULT_QUESTION_TIME;
use crate::libwaraqa::numerals::NumeralMode;

/// Export parameters for both HTML targets. Persisted separately from the
/// question list, with its own load/save/clear lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorksheetConfig {
    pub title: String,
    pub instructions: String,
    pub footer: String,
    pub logo: Option<String>,
    pub logo_alt: String,
    pub numeral_type: NumeralMode,
    pub teacher_name: String,
    pub seal: Option<String>,
    pub use_timer: bool,
    /// Whole-document countdown for the worksheet, in minutes.
    pub timer_duration: u32,
    /// Per-question countdown for the interactive quiz, in seconds.
    pub question_time: Option<u32>,
    pub show_print_button: bool,
}

impl Default for WorksheetConfig {
    fn default() -> WorksheetConfig {
        WorksheetConfig {
            title: String::new(),
            instructions: String::new(),
            footer: String::new(),
            logo: None,
            logo_alt: "شعار".to_string(),
            numeral_type: NumeralMode::Eastern,
            teacher_name: String::new(),
            seal: None,
            use_timer: false,
            timer_duration: 20,
            question_time: None,
            show_print_button: true,
        }
    }
}

impl WorksheetConfig {
    pub fn title_or(&self, fallback: &str) -> String {
        if self.title.trim().is_empty() {
            fallback.to_string()
        } else {
            self.title.clone()
        }
    }

    pub fn teacher_name_or_default(&self) -> String {
        if self.teacher_name.trim().is_empty() {
            "معلم المادة".to_string()
        } else {
            self.teacher_name.clone()
        }
    }

    pub fn timer_minutes(&self) -> u32 {
        if self.timer_duration == 0 {
            20
        } else {
            self.timer_duration
        }
    }

    pub fn question_seconds(&self) -> u32 {
        match self.question_time {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_QUESTION_TIME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: WorksheetConfig =
            serde_json::from_str(r#"{"title": "اختبار", "useTimer": true}"#)
                .expect("partial config parses");
        assert_eq!(config.title, "اختبار");
        assert!(config.use_timer);
        assert_eq!(config.numeral_type, NumeralMode::Eastern);
        assert_eq!(config.timer_duration, 20);
        assert!(config.show_print_button);
    }

    #[test]
    fn fallbacks_kick_in_for_blank_fields() {
        let config = WorksheetConfig::default();
        assert_eq!(config.title_or("ورقة عمل"), "ورقة عمل");
        assert_eq!(config.teacher_name_or_default(), "معلم المادة");
        assert_eq!(config.question_seconds(), DEFAULT_QUESTION_TIME);
        let timed = WorksheetConfig {
            question_time: Some(90),
            ..WorksheetConfig::default()
        };
        assert_eq!(timed.question_seconds(), 90);
    }
}
