//! Plain-text cleaning for the flat target dialect.
//!
//! The CDATA dialect passes source text through untouched; everything here
//! is only applied when the target schema wants plain text.

/// Clean free text for plain-text target fields.
///
/// Strips HTML tags, decodes HTML entities twice (some upstream feeds arrive
/// doubly escaped — the second pass is a compatibility shim for those and is
/// not applied anywhere else), then collapses whitespace runs (including
/// non-breaking spaces) to single spaces and trims.
pub fn clean_text(input: &str) -> String {
    let stripped = strip_tags(input);
    let decoded = html_escape::decode_html_entities(&stripped);
    let decoded = html_escape::decode_html_entities(decoded.as_ref()).into_owned();
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip HTML tags from a string by tag-delimiter removal.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Truncate to at most `max` characters, replacing the tail with `"..."`
/// when the input is over the limit.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Truncate to at most `max` characters, no marker.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}
