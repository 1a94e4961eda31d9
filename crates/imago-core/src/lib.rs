//! # imago-core
//!
//! Engine behind the imago IIIF gallery tools: normalizes presentation
//! manifests across both schema generations into flat display records,
//! and reassembles edited page subsets into exportable collections.
//!
//! ## Components
//!
//! - [`manifest`]: typed document model over v2/v3 conventions, version
//!   detection, polymorphic label/value text, parsing entry points
//! - [`metadata`]: case-insensitive lookup over description entries and
//!   the per-field priority chains producing a [`DisplayRecord`]
//! - [`image`]: image-service location plus thumbnail/info URL templates
//! - [`gallery`]: gallery state (documents + display cards) and the
//!   session controller driving load, add, select, reorder, export
//! - [`export`]: collection and flattened serializations
//! - [`deeplink`]: query-parameter loading with hosting rewrites
//! - [`filename`]: export filename sanitization and fallbacks
//! - [`http`]: thin fetch client
//!
//! ## Example
//!
//! ```
//! use imago_core::{GallerySession, ExportFormat, ExportOptions};
//!
//! let text = r#"{
//!     "@context": "http://iiif.io/api/presentation/2/context.json",
//!     "items": [{
//!         "@id": "https://example.org/m",
//!         "label": "A Map",
//!         "sequences": [{ "canvases": [{
//!             "@id": "c0",
//!             "images": [{ "resource": { "service": { "@id": "https://img.example/c0" } } }]
//!         }] }]
//!     }]
//! }"#;
//!
//! let mut session = GallerySession::new();
//! let report = session.load_collection_text(text)?;
//! assert_eq!(report.pages_added, 1);
//! assert_eq!(session.state().cards()[0].record.title, "A Map");
//!
//! let artifact = session.export(&ExportOptions {
//!     format: ExportFormat::Collection,
//!     name: Some("demo".to_string()),
//! })?;
//! assert_eq!(artifact.filename, "demo.json");
//! # Ok::<(), imago_core::GalleryError>(())
//! ```

pub mod deeplink;
pub mod error;
pub mod export;
pub mod filename;
pub mod gallery;
pub mod http;
pub mod image;
pub mod manifest;
pub mod metadata;

pub use error::{ExportError, GalleryError, LoadError, Result};
pub use export::{ExportArtifact, ExportFormat, ExportOptions};
pub use gallery::session::{AddOutcome, BatchReport, GallerySession, LoadReport};
pub use gallery::{Card, GalleryState, LoadedDocument};
pub use image::{ImageSource, ThumbnailSpec};
pub use manifest::{
    parse_collection, parse_document, CollectionDocument, DescriptionEntry, Document, IiifVersion,
    Page, TextValue,
};
pub use metadata::{lookup, resolve_record, DisplayRecord, MatchPick};
