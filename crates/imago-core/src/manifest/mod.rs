//! IIIF presentation document model
//!
//! Typed views over both schema generations. Only the fields the
//! resolution and export engines read are modeled; everything else a
//! producer wrote rides along in `extra` maps, so re-serialized
//! documents keep their original fields.

mod parse;
mod text;
mod version;

pub use parse::{parse_collection, parse_document};
pub use text::TextValue;
pub use version::IiifVersion;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LoadError;

/// A single manifest: one described item with its ordered pages.
///
/// Both naming conventions (`@id`/`id`) and both page containers
/// (`sequences`/`items`) are modeled; [`IiifVersion::detect`] decides
/// which side is live for a given document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<TextValue>,
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub compat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub compat_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<DescriptionEntry>,
    /// v2 page container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<Sequence>>,
    /// v3 page container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Page>>,
    /// v2 attribution statement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<TextValue>,
    /// v3 publishing agents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider: Vec<Provider>,
    #[serde(rename = "requiredStatement", skip_serializing_if = "Option::is_none")]
    pub required_statement: Option<RequiredStatement>,
    /// v2 landing-page reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Related>,
    /// v3 landing-page references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub homepage: Vec<Homepage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// The document URI under either naming convention.
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.compat_id.as_deref())
    }

    /// Version-aware page list. Lenient: a missing or empty container
    /// is an empty list, never an error.
    pub fn pages(&self) -> &[Page] {
        match IiifVersion::detect(self) {
            IiifVersion::V3 => self.items.as_deref().unwrap_or(&[]),
            IiifVersion::V2 => self
                .sequences
                .as_deref()
                .and_then(|sequences| sequences.first())
                .and_then(|sequence| sequence.canvases.as_deref())
                .unwrap_or(&[]),
        }
    }

    /// Replace the page list version-correctly, keeping every other field.
    ///
    /// On v2 only the first sequence survives, rebuilt around the new
    /// canvases; trailing sequences are dropped.
    pub fn with_pages(&self, pages: Vec<Page>) -> Document {
        let mut document = self.clone();
        match IiifVersion::detect(self) {
            IiifVersion::V3 => document.items = Some(pages),
            IiifVersion::V2 => {
                let mut sequence = self
                    .sequences
                    .as_deref()
                    .and_then(|sequences| sequences.first())
                    .cloned()
                    .unwrap_or_default();
                sequence.canvases = Some(pages);
                document.sequences = Some(vec![sequence]);
            }
        }
        document
    }

    /// Check the version-keyed page container the way the interactive
    /// loader does: v3 requires a non-empty `items`, v2 requires
    /// `sequences[0].canvases` to exist (it may be empty).
    pub fn validate_page_container(&self) -> Result<(), LoadError> {
        match IiifVersion::detect(self) {
            IiifVersion::V3 => {
                if self.items.as_ref().is_none_or(|items| items.is_empty()) {
                    return Err(LoadError::MissingPages {
                        version: IiifVersion::V3,
                    });
                }
            }
            IiifVersion::V2 => {
                let has_canvases = self
                    .sequences
                    .as_deref()
                    .and_then(|sequences| sequences.first())
                    .is_some_and(|sequence| sequence.canvases.is_some());
                if !has_canvases {
                    return Err(LoadError::MissingPages {
                        version: IiifVersion::V2,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A collection container: an ordered list of member documents.
///
/// Gallery files are read and written in this shape; members keep
/// whatever version convention they were loaded with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<TextValue>,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub compat_type: Option<String>,
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub compat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    pub items: Vec<Document>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v2 sequence: an ordered canvas run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub compat_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvases: Option<Vec<Page>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One canvas: a single image-bearing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub compat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<DescriptionEntry>,
    /// v2 image annotations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAnnotation>,
    /// v3 annotation pages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AnnotationPage>,
    /// v2 annotation-list references; repaired to list shape on export
    #[serde(rename = "otherContent", skip_serializing_if = "Option::is_none")]
    pub other_content: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// The canvas URI under either naming convention.
    pub fn identifier(&self) -> Option<&str> {
        self.compat_id.as_deref().or(self.id.as_deref())
    }
}

/// A label/value pair attached to a document or page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DescriptionEntry {
    /// A plain-string entry, as written into exported pages.
    pub fn plain(label: &str, value: &str) -> DescriptionEntry {
        DescriptionEntry {
            label: Some(TextValue::Plain(label.to_string())),
            value: Some(TextValue::Plain(value.to_string())),
            extra: Map::new(),
        }
    }
}

/// v2 painting annotation on a canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ImageResource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The image resource inside a v2 annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v3 annotation page inside a canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Annotation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v3 painting annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<AnnotationBody>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The painted body of a v3 annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An image-service reference: v3 writes a list, v2 a single object,
/// and producers are loose about it in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    One(ImageService),
    Many(Vec<ImageService>),
    Other(Value),
}

impl ServiceRef {
    /// The service consulted for image requests: the sole entry, or the
    /// first of a list.
    pub fn primary(&self) -> Option<&ImageService> {
        match self {
            ServiceRef::One(service) => Some(service),
            ServiceRef::Many(services) => services.first(),
            ServiceRef::Other(_) => None,
        }
    }
}

/// An image service endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageService {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub compat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageService {
    /// The service base URI under either naming convention.
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.compat_id.as_deref())
    }
}

/// v3 publishing agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v3 required statement (usage terms, credit lines).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TextValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v2 related resource: either a bare URL string or an object with `@id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related {
    Link(String),
    Resource(RelatedResource),
    Other(Value),
}

impl Related {
    /// The landing-page URL however it was encoded.
    pub fn url(&self) -> Option<String> {
        match self {
            Related::Link(url) => Some(url.clone()),
            Related::Resource(resource) => resource.compat_id.clone(),
            Related::Other(_) => None,
        }
    }
}

/// Object form of a v2 related reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedResource {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub compat_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// v3 homepage reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Homepage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
