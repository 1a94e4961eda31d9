//! Gallery state: loaded documents and their display cards

pub mod session;

use serde::{Deserialize, Serialize};

use crate::image;
use crate::manifest::{Document, IiifVersion, Page};
use crate::metadata::{resolve_record, DisplayRecord};

/// A loaded document and the key its cards reference.
///
/// Documents without an identifier get a synthetic position-based key,
/// so card grouping never collides with a real URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedDocument {
    pub key: String,
    pub document: Document,
}

/// One rendered page: the snapshot needed to rebuild exports plus the
/// resolved record shown on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Key of the owning document
    pub document_id: String,
    /// Position of the page in the owning document's page list
    pub page_index: usize,
    /// Snapshot of the page as loaded
    pub page: Page,
    pub record: DisplayRecord,
}

/// Session-wide ordered gallery state.
///
/// Documents accumulate in load order; cards live in display order and
/// may diverge from load order through reordering. Reset on every full
/// gallery load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryState {
    documents: Vec<LoadedDocument>,
    cards: Vec<Card>,
}

impl GalleryState {
    pub fn new() -> GalleryState {
        GalleryState::default()
    }

    /// Documents in accumulation order.
    pub fn documents(&self) -> &[LoadedDocument] {
        &self.documents
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Drop every document and card.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.cards.clear();
    }

    /// Append a document and derive a card for each locatable page.
    ///
    /// Pages without an image service are skipped with a diagnostic;
    /// the document itself is always kept. Returns (added, skipped).
    pub fn add_document(&mut self, document: Document) -> (usize, usize) {
        let version = IiifVersion::detect(&document);
        let key = document
            .identifier()
            .map(str::to_string)
            .unwrap_or_else(|| format!("urn:imago:document:{}", self.documents.len()));

        let mut added = 0;
        let mut skipped = 0;
        for (index, page) in document.pages().iter().enumerate() {
            match image::locate(page, version) {
                Some(source) => {
                    let record = resolve_record(&document, page, &source);
                    self.cards.push(Card {
                        document_id: key.clone(),
                        page_index: index,
                        page: page.clone(),
                        record,
                    });
                    added += 1;
                }
                None => {
                    tracing::warn!(
                        version = %version,
                        canvas = page.identifier().unwrap_or("<unidentified>"),
                        "image service missing or lacks an identifier, page skipped"
                    );
                    skipped += 1;
                }
            }
        }
        self.documents.push(LoadedDocument { key, document });
        (added, skipped)
    }

    /// Remove one card by display position.
    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Move a card to a new display position.
    pub fn move_card(&mut self, from: usize, to: usize) -> bool {
        if from >= self.cards.len() || to >= self.cards.len() {
            return false;
        }
        let card = self.cards.remove(from);
        self.cards.insert(to, card);
        true
    }
}
