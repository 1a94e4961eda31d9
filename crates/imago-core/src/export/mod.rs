//! Collection assembly and serialization
//!
//! Rebuilds edited page subsets into valid v2-convention containers.
//! Two formats exist: a collection of member manifests, and a single
//! flattened manifest holding every visible page. Both are written with
//! v2 context and type markers regardless of the versions loaded.

use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::filename;
use crate::gallery::GalleryState;
use crate::manifest::{
    CollectionDocument, DescriptionEntry, Document, IiifVersion, Page, Sequence, TextValue,
};
use crate::metadata::{lookup, MatchPick};

/// Context URI stamped on every export.
pub const V2_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";

/// Serialization formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Collection of member manifests
    #[default]
    Collection,
    /// Single manifest holding every visible page
    Flattened,
}

/// Options for export
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Gallery name; drives the synthetic identifier and the download
    /// filename. Unusable names fall back to a dated generated one.
    pub name: Option<String>,
}

/// A finished export: canonical JSON plus its download filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub json: String,
    pub document_count: usize,
    pub page_count: usize,
}

/// Run the configured export over the current gallery state.
pub fn export(state: &GalleryState, options: &ExportOptions) -> Result<ExportArtifact, ExportError> {
    if state.cards().is_empty() {
        return Err(ExportError::EmptyGallery);
    }
    let name = filename::effective_name(options.name.as_deref());
    let artifact = match options.format {
        ExportFormat::Collection => {
            let documents = rebuild_documents(state);
            let page_count = documents.iter().map(|doc| doc.pages().len()).sum();
            ExportArtifact {
                filename: filename::export_filename(&name),
                document_count: documents.len(),
                page_count,
                json: serialize_collection(documents, &name)?,
            }
        }
        ExportFormat::Flattened => ExportArtifact {
            filename: filename::export_filename(&name),
            document_count: 1,
            page_count: state.cards().len(),
            json: serialize_flattened(state, &name)?,
        },
    };
    Ok(artifact)
}

/// Extract a page subset into a synthetic document.
///
/// Indices are deduplicated and applied in ascending order no matter
/// what order pages were picked in; out-of-range indices are dropped.
/// Every document-level field carries over, and the result always gets
/// a usable title.
pub fn select_pages(document: &Document, indices: &[usize]) -> Document {
    let pages = document.pages();
    let mut sorted: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&index| index < pages.len())
        .collect();
    sorted.sort_unstable();
    sorted.dedup();
    let selected: Vec<Page> = sorted.into_iter().map(|index| pages[index].clone()).collect();
    let mut selection = document.with_pages(selected);
    ensure_title(&mut selection);
    selection
}

/// Rebuild one document per owning manifest from the live card order.
///
/// Membership and document order follow the display (first-seen order of
/// each document among the cards). Page order within a document stays
/// the original page order, not the display order; deleting cards only
/// narrows membership. Only exact duplicate page snapshots collapse, so
/// pages picked from the same manifest in separate passes all survive
/// even though their selection-relative positions collide. A document
/// with no surviving cards drops out.
pub fn rebuild_documents(state: &GalleryState) -> Vec<Document> {
    let mut order: Vec<&str> = Vec::new();
    for card in state.cards() {
        if !order.contains(&card.document_id.as_str()) {
            order.push(&card.document_id);
        }
    }

    let mut rebuilt = Vec::new();
    for key in order {
        let Some(loaded) = state.documents().iter().find(|loaded| loaded.key == key) else {
            continue;
        };
        let mut group: Vec<(usize, &Page)> = state
            .cards()
            .iter()
            .filter(|card| card.document_id == key)
            .map(|card| (card.page_index, &card.page))
            .collect();
        group.sort_by_key(|(index, _)| *index);
        group.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);
        let pages: Vec<Page> = group.into_iter().map(|(_, page)| page.clone()).collect();
        if pages.is_empty() {
            continue;
        }
        rebuilt.push(loaded.document.with_pages(pages));
    }
    rebuilt
}

/// Wrap rebuilt documents in the collection container and serialize.
pub fn serialize_collection(
    documents: Vec<Document>,
    name: &str,
) -> Result<String, ExportError> {
    let collection = CollectionDocument {
        context: Some(TextValue::Plain(V2_CONTEXT.to_string())),
        compat_type: Some("sc:Collection".to_string()),
        compat_id: Some(format!("https://example.org/collection/{name}")),
        id: None,
        label: Some(TextValue::Plain(name.to_string())),
        items: documents,
        extra: Map::new(),
    };
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// Flatten every visible page into one synthetic manifest in display
/// order, with per-page traceability metadata injected.
pub fn serialize_flattened(state: &GalleryState, name: &str) -> Result<String, ExportError> {
    let canvases: Vec<Page> = state
        .cards()
        .iter()
        .map(|card| {
            let mut page = card.page.clone();
            annotate_origin(&mut page, &card.document_id);
            repair_other_content(&mut page);
            page
        })
        .collect();

    let manifest = Document {
        context: Some(TextValue::Plain(V2_CONTEXT.to_string())),
        compat_id: Some(format!("https://example.org/manifest/{name}")),
        compat_type: Some("sc:Manifest".to_string()),
        label: Some(TextValue::Plain(name.to_string())),
        sequences: Some(vec![Sequence {
            compat_type: Some("sc:Sequence".to_string()),
            canvases: Some(canvases),
            extra: Map::new(),
        }]),
        ..Document::default()
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}

/// A synthetic document needs a usable title: resolved label, else a
/// metadata Title, else its first page's label, else a fixed literal.
fn ensure_title(document: &mut Document) {
    let existing = document
        .label
        .as_ref()
        .and_then(TextValue::first_string)
        .is_some_and(|title| !title.trim().is_empty());
    if existing {
        return;
    }
    let derived = lookup(&document.metadata, "Title", MatchPick::First)
        .or_else(|| {
            document
                .pages()
                .first()
                .and_then(|page| page.label.as_ref())
                .and_then(TextValue::first_string)
        })
        .unwrap_or_else(|| "Selected Pages".to_string());
    let version = IiifVersion::detect(document);
    document.label = Some(match version {
        IiifVersion::V3 => {
            let mut languages = Map::new();
            languages.insert("none".to_string(), serde_json::json!([derived]));
            TextValue::Localized(languages)
        }
        IiifVersion::V2 => TextValue::Plain(derived),
    });
}

/// Traceability: record which document and canvas each flattened page
/// came from.
fn annotate_origin(page: &mut Page, document_id: &str) {
    let origin = page.identifier().map(str::to_string);
    page.metadata
        .push(DescriptionEntry::plain("Source Manifest", document_id));
    if let Some(canvas_id) = origin {
        page.metadata
            .push(DescriptionEntry::plain("Source Canvas", &canvas_id));
    }
}

/// Some producers write `otherContent` as a bare object; the schema
/// wants a list.
fn repair_other_content(page: &mut Page) {
    if let Some(value) = page.other_content.take() {
        page.other_content = Some(match value {
            Value::Array(_) => value,
            scalar => Value::Array(vec![scalar]),
        });
    }
}
