//! Entry points turning raw JSON text into documents

use crate::error::LoadError;

use super::{CollectionDocument, Document};

/// Parse one manifest document.
pub fn parse_document(text: &str) -> Result<Document, LoadError> {
    serde_json::from_str(text).map_err(|err| LoadError::Parse {
        message: err.to_string(),
    })
}

/// Parse a gallery/collection file.
///
/// The member list must be present and must be a list; anything else is
/// rejected before a caller touches its own state, so a failed load
/// leaves an existing gallery intact.
pub fn parse_collection(text: &str) -> Result<CollectionDocument, LoadError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|err| LoadError::Parse {
        message: err.to_string(),
    })?;
    if !value.get("items").is_some_and(serde_json::Value::is_array) {
        return Err(LoadError::NotACollection);
    }
    serde_json::from_value(value).map_err(|err| LoadError::Parse {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_manifest() {
        let doc = parse_document(r#"{ "@id": "https://example.org/m", "label": "Map" }"#).unwrap();
        assert_eq!(doc.identifier(), Some("https://example.org/m"));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn collection_requires_an_item_list() {
        let err = parse_collection(r#"{ "label": "no items here" }"#).unwrap_err();
        assert!(matches!(err, LoadError::NotACollection));

        let err = parse_collection(r#"{ "items": "not a list" }"#).unwrap_err();
        assert!(matches!(err, LoadError::NotACollection));
    }

    #[test]
    fn collection_members_parse_as_documents() {
        let collection = parse_collection(
            r#"{
                "@context": "http://iiif.io/api/presentation/2/context.json",
                "@type": "sc:Collection",
                "label": "saved gallery",
                "items": [
                    { "@id": "https://example.org/m1", "sequences": [{ "canvases": [] }] },
                    { "id": "https://example.org/m2", "items": [] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(collection.items.len(), 2);
        assert_eq!(collection.items[0].identifier(), Some("https://example.org/m1"));
    }

    #[test]
    fn empty_item_list_is_a_valid_collection() {
        let collection = parse_collection(r#"{ "items": [] }"#).unwrap();
        assert!(collection.items.is_empty());
    }
}
