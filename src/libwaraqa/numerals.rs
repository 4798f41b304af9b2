use serde::{Deserialize, Serialize};

/// Display transform for every numeral the end user sees. `Eastern` maps
/// ASCII digits to Arabic-indic glyphs; `Western` passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralMode {
    #[default]
    Eastern,
    Western,
}

pub const EASTERN_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

impl NumeralMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumeralMode::Eastern => "eastern",
            NumeralMode::Western => "western",
        }
    }

    pub fn from_str(s: &str) -> Option<NumeralMode> {
        match s {
            "eastern" => Some(NumeralMode::Eastern),
            "western" => Some(NumeralMode::Western),
            _ => None,
        }
    }
}

pub fn format_number(mode: NumeralMode, n: u64) -> String {
    convert_digits(mode, &n.to_string())
}

/// Rewrites ASCII digits in plain text. Do not hand this markup; that is
/// what [`format_html`] is for.
pub fn convert_digits(mode: NumeralMode, text: &str) -> String {
    if mode == NumeralMode::Western {
        return text.to_string();
    }
    text.chars()
        .map(|ch| match ch {
            '0'..='9' => EASTERN_DIGITS[ch as usize - '0' as usize],
            other => other,
        })
        .collect()
}

/// Rewrites digits in an HTML fragment's character data only. Tag contents
/// (names, attributes such as `data-original-index`) and character
/// references pass through untouched, so structural indices stay ASCII and
/// the browser can still decode entities.
pub fn format_html(mode: NumeralMode, html: &str) -> String {
    if mode == NumeralMode::Western {
        return html.to_string();
    }
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut entity = String::new();
    let mut in_entity = false;
    for ch in html.chars() {
        if in_entity {
            entity.push(ch);
            // entities are short; anything longer is just text after all
            if ch == ';' || entity.len() > 10 {
                out.push_str(&entity);
                entity.clear();
                in_entity = false;
            }
            continue;
        }
        match ch {
            '<' => {
                in_tag = true;
                out.push(ch);
            }
            '>' => {
                in_tag = false;
                out.push(ch);
            }
            '&' if !in_tag => {
                in_entity = true;
                entity.push(ch);
            }
            '0'..='9' if !in_tag => out.push(EASTERN_DIGITS[ch as usize - '0' as usize]),
            other => out.push(other),
        }
    }
    out.push_str(&entity);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_per_mode() {
        assert_eq!(format_number(NumeralMode::Eastern, 12), "١٢");
        assert_eq!(format_number(NumeralMode::Western, 12), "12");
        assert_eq!(format_number(NumeralMode::Eastern, 0), "٠");
    }

    #[test]
    fn format_html_rewrites_text_but_not_attributes() {
        let html = r#"<li data-original-index="3">الخطوة 3</li>"#;
        let out = format_html(NumeralMode::Eastern, html);
        assert_eq!(out, r#"<li data-original-index="3">الخطوة ٣</li>"#);
    }

    #[test]
    fn western_mode_is_identity() {
        let html = r#"<span id="q1">step 1</span>"#;
        assert_eq!(format_html(NumeralMode::Western, html), html);
    }

    #[test]
    fn character_references_survive() {
        let out = format_html(NumeralMode::Eastern, "2 &#60; 3 &amp; 4");
        assert_eq!(out, "٢ &#60; ٣ &amp; ٤");
    }

    #[test]
    fn mode_names_roundtrip() {
        assert_eq!(NumeralMode::from_str("eastern"), Some(NumeralMode::Eastern));
        assert_eq!(NumeralMode::from_str("western"), Some(NumeralMode::Western));
        assert_eq!(NumeralMode::from_str("roman"), None);
        assert_eq!(NumeralMode::Eastern.as_str(), "eastern");
    }

    #[test]
    fn serde_names_are_lowercase() {
        let json = serde_json::to_string(&NumeralMode::Eastern).expect("mode serializes");
        assert_eq!(json, "\"eastern\"");
        let back: NumeralMode = serde_json::from_str("\"western\"").expect("mode parses");
        assert_eq!(back, NumeralMode::Western);
    }
}
