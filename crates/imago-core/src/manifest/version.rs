//! Presentation API version detection

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Document;

/// Schema generation of a presentation document.
///
/// Everything downstream branches on this: where pages live, where the
/// image service hangs, which attribution fields exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IiifVersion {
    /// Presentation API 2.x: `@id` conventions, sequences of canvases
    V2,
    /// Presentation API 3.0: `id` conventions, items of canvases
    V3,
}

impl fmt::Display for IiifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IiifVersion::V2 => write!(f, "IIIF 2.0"),
            IiifVersion::V3 => write!(f, "IIIF 3.0"),
        }
    }
}

impl IiifVersion {
    /// Classify a document. Total: every document gets a version and
    /// proceeds through version-keyed access, even when malformed.
    ///
    /// The `@context` URI wins when present, whether single or listed:
    /// a `/3/` path segment means 3.0 and is checked before `/2/`.
    /// Without a usable context, the presence of the v2 `sequences`
    /// container decides (even an empty one), defaulting to 3.0.
    pub fn detect(document: &Document) -> IiifVersion {
        if let Some(context) = &document.context {
            let candidates = context.candidates();
            if candidates.iter().any(|uri| uri.contains("/3/")) {
                return IiifVersion::V3;
            }
            if candidates.iter().any(|uri| uri.contains("/2/")) {
                return IiifVersion::V2;
            }
        }
        if document.sequences.is_some() {
            IiifVersion::V2
        } else {
            IiifVersion::V3
        }
    }
}
