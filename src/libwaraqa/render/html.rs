use serde::Serialize;

/// Escapes text for interpolation into markup or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Serializes a value for embedding inside an inline `<script>` block.
/// Every `</` becomes `<\/` so markup like a stray `</script>` in question
/// text cannot terminate the block early; `\/` is a plain JSON escape, so
/// the parsed value is unchanged.
pub fn embed_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .expect("embedded snapshot serializes")
        .replace("</", "<\\/")
}
