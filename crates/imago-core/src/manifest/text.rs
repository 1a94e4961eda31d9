//! Polymorphic label and value text
//!
//! Presentation API 2.x writes labels and metadata values as plain strings
//! (or lists of them); 3.0 writes language maps such as
//! `{"en": ["Map of Texas"]}`. Real-world documents mix the styles freely,
//! even within one manifest, so the encoding is modeled as its own type
//! and resolved by a single set of rules regardless of document version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A label or metadata value in any of the encodings observed in the wild.
///
/// Deserialization is total: every JSON value maps to exactly one variant,
/// with [`TextValue::Other`] catching scalars no document should contain.
/// Serialization reproduces the original shape byte-for-byte, so untouched
/// documents re-export faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// v2 style: a bare string
    Plain(String),
    /// A list of values; some producers nest language maps inside
    List(Vec<TextValue>),
    /// v3 style: language code (or "none") to a list of strings
    Localized(Map<String, Value>),
    /// Anything else (numbers, booleans, null); resolves to nothing
    Other(Value),
}

impl TextValue {
    /// Resolve to a single display string.
    ///
    /// Plain strings pass through unchanged. Lists yield their first
    /// entry, descending when a producer has wrapped a language map
    /// inside the list. Language maps yield the first string across all
    /// languages in document order, so a map listing `"none"` before
    /// `"en"` resolves to the `"none"` entry. An unusable value resolves
    /// to `None`; absence is an expected state here, not an error.
    pub fn first_string(&self) -> Option<String> {
        match self {
            TextValue::Plain(text) => Some(text.clone()),
            TextValue::List(items) => items.first().and_then(TextValue::first_string),
            TextValue::Localized(map) => flattened_strings(map).next(),
            TextValue::Other(_) => None,
        }
    }

    /// Every string candidate in this value, flattened in document order.
    ///
    /// Used for label matching, where any language form of a label may
    /// equal the requested name.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            TextValue::Plain(text) => vec![text.clone()],
            TextValue::List(items) => items.iter().flat_map(TextValue::candidates).collect(),
            TextValue::Localized(map) => flattened_strings(map).collect(),
            TextValue::Other(_) => Vec::new(),
        }
    }
}

/// Flatten a language map's values one level, keeping strings.
///
/// `{"en": ["a", "b"], "fr": "c"}` yields `a`, `b`, `c`; iteration
/// order is the document's key order.
fn flattened_strings(map: &Map<String, Value>) -> impl Iterator<Item = String> + '_ {
    map.values().flat_map(|value| match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: Value) -> TextValue {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(
            text(json!("Map of Texas")).first_string(),
            Some("Map of Texas".to_string())
        );
    }

    #[test]
    fn list_yields_first_entry() {
        assert_eq!(
            text(json!(["first", "second"])).first_string(),
            Some("first".to_string())
        );
    }

    #[test]
    fn list_descends_into_nested_language_map() {
        let value = text(json!([{ "en": ["nested title"] }, "second"]));
        assert_eq!(value.first_string(), Some("nested title".to_string()));
    }

    #[test]
    fn language_map_flattens_in_document_order() {
        let value = text(json!({ "none": ["untagged"], "en": ["english"] }));
        assert_eq!(value.first_string(), Some("untagged".to_string()));
    }

    #[test]
    fn language_map_with_bare_string_value() {
        let value = text(json!({ "en": "bare" }));
        assert_eq!(value.first_string(), Some("bare".to_string()));
    }

    #[test]
    fn empty_language_map_resolves_to_nothing() {
        assert_eq!(text(json!({})).first_string(), None);
    }

    #[test]
    fn scalar_junk_resolves_to_nothing() {
        assert_eq!(text(json!(1885)).first_string(), None);
        assert_eq!(text(json!(null)).first_string(), None);
        assert_eq!(text(json!(true)).first_string(), None);
    }

    #[test]
    fn candidates_cover_every_language() {
        let value = text(json!({ "en": ["Title"], "fr": ["Titre"] }));
        assert_eq!(value.candidates(), vec!["Title", "Titre"]);
    }

    #[test]
    fn reserializes_in_original_shape() {
        for raw in [
            json!("plain"),
            json!(["a", "b"]),
            json!({ "en": ["x"], "none": ["y"] }),
            json!(42),
        ] {
            let value: TextValue = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(serde_json::to_value(&value).unwrap(), raw);
        }
    }
}
