//! Session controller: explicit operations over owned gallery state
//!
//! Every mutation goes through these request/response methods, so any
//! surface (CLI, tests, a future UI) drives the same path and there is
//! no ambient global state.

use crate::error::{GalleryError, LoadError, Result};
use crate::export::{self, ExportArtifact, ExportOptions};
use crate::http::HttpClient;
use crate::manifest::{parse_collection, parse_document, Document};

use super::{Card, GalleryState};

/// Outcome of offering one manifest to the gallery.
#[derive(Debug, Clone)]
pub enum AddOutcome {
    /// Single-page manifest, added directly
    Added { pages: usize },
    /// Multi-page manifest: the caller picks pages, then calls
    /// [`GallerySession::add_selected_pages`]
    NeedsSelection(Box<Document>),
}

/// What a full collection load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub documents: usize,
    pub pages_added: usize,
    pub pages_skipped: usize,
}

/// Per-URL results of a batch add, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(String, AddOutcome)>,
    pub failures: Vec<(String, GalleryError)>,
}

/// One gallery session: owned state plus the fetch client.
pub struct GallerySession {
    state: GalleryState,
    http: HttpClient,
}

impl GallerySession {
    pub fn new() -> GallerySession {
        GallerySession {
            state: GalleryState::new(),
            http: HttpClient::default(),
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Replace the gallery with the contents of a collection file.
    ///
    /// Parsing and shape validation happen before any state is touched,
    /// so a failed load leaves the current gallery exactly as it was.
    pub fn load_collection_text(&mut self, text: &str) -> Result<LoadReport> {
        let collection = parse_collection(text)?;
        self.state.reset();
        let mut report = LoadReport::default();
        for document in collection.items {
            let (added, skipped) = self.state.add_document(document);
            report.documents += 1;
            report.pages_added += added;
            report.pages_skipped += skipped;
        }
        Ok(report)
    }

    /// Offer a parsed manifest to the gallery: single-page manifests go
    /// straight in, multi-page manifests come back for page selection.
    pub fn add_parsed(&mut self, document: Document) -> Result<AddOutcome> {
        document.validate_page_container()?;
        if document.pages().len() > 1 {
            return Ok(AddOutcome::NeedsSelection(Box::new(document)));
        }
        let (added, _) = self.state.add_document(document);
        Ok(AddOutcome::Added { pages: added })
    }

    /// Fetch raw text over HTTP. Redirect chains follow the client's
    /// default policy; a non-success status is a hard failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).await.map_err(LoadError::from)?;
        if !response.is_success() {
            return Err(LoadError::Http {
                status: response.status,
                url: url.to_string(),
            }
            .into());
        }
        Ok(response.body)
    }

    /// Fetch and parse one remote manifest.
    pub async fn fetch_manifest(&self, url: &str) -> Result<Document> {
        let body = self.fetch_text(url).await?;
        Ok(parse_document(&body)?)
    }

    /// Fetch one manifest and offer it to the gallery.
    pub async fn add_manifest_url(&mut self, url: &str) -> Result<AddOutcome> {
        let document = self.fetch_manifest(url).await?;
        self.add_parsed(document)
    }

    /// Process a comma-separated URL list strictly in input order.
    ///
    /// A failed entry is logged and recorded; the batch continues with
    /// the next URL.
    pub async fn add_manifest_list(&mut self, input: &str) -> BatchReport {
        let mut report = BatchReport::default();
        for url in split_url_list(input) {
            match self.add_manifest_url(&url).await {
                Ok(outcome) => report.outcomes.push((url, outcome)),
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "manifest load failed, batch continues");
                    report.failures.push((url, err));
                }
            }
        }
        report
    }

    /// Add the picked pages of a multi-page manifest. Returns how many
    /// cards appeared.
    pub fn add_selected_pages(&mut self, document: &Document, indices: &[usize]) -> usize {
        let selection = export::select_pages(document, indices);
        let (added, _) = self.state.add_document(selection);
        added
    }

    /// Remove one card by display position.
    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        self.state.remove_card(index)
    }

    /// Move a card to a new display position.
    pub fn move_card(&mut self, from: usize, to: usize) -> bool {
        self.state.move_card(from, to)
    }

    /// Produce the export artifact for the current display state.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportArtifact> {
        Ok(export::export(&self.state, options)?)
    }
}

impl Default for GallerySession {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the URL input format: comma separated, whitespace trimmed,
/// empty segments dropped.
pub fn split_url_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
