//! Download filename derivation for export artifacts

use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap();
    static ref MULTIPLE_SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs and strip filesystem-unsafe characters.
///
/// Whitespace collapses first: tab and newline fall inside the
/// control-character class, so stripping first would delete them
/// instead of leaving a separating space.
pub fn sanitize_name(input: &str) -> String {
    let collapsed = MULTIPLE_SPACES.replace_all(input, " ");
    UNSAFE_CHARS
        .replace_all(&collapsed, "")
        .trim()
        .to_string()
}

/// The name an export runs under: the sanitized user-supplied name when
/// anything survives sanitization, else a dated generated one.
pub fn effective_name(supplied: Option<&str>) -> String {
    match supplied.map(sanitize_name) {
        Some(name) if !name.is_empty() => name,
        _ => format!("iiif-gallery-{}", Local::now().format("%Y-%m-%d")),
    }
}

/// Download filename for an export artifact.
pub fn export_filename(name: &str) -> String {
    format!("{name}.json")
}
