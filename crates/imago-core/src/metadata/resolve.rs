//! Field resolution: heterogeneous description entries down to one
//! always-populated display record per page
//!
//! Each output field walks an ordered list of metadata labels across the
//! page and its owning document. The lists encode the label vocabulary of
//! the source institutions seen in practice (Library of Congress, Internet
//! Archive, David Rumsey/LUNA, museum collections); order is priority,
//! earlier entries win, and every field ends in a fixed literal so a
//! record is never partially populated.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::image::{ImageSource, ThumbnailSpec};
use crate::manifest::{Document, IiifVersion, Page, Related, TextValue};

use super::lookup::{lookup, MatchPick};

pub const NO_TITLE: &str = "No title returned";
pub const NO_AUTHOR: &str = "No author returned";
pub const NO_DATE: &str = "No date returned";
pub const NO_COLLECTION: &str = "No collection returned";
pub const NO_ATTRIBUTION: &str = "No attribution returned";
pub const NO_LINK: &str = "No link available";

lazy_static! {
    static ref ABSOLUTE_URL: Regex = Regex::new(r"(?i)^https?://").unwrap();
    static ref EMBEDDED_HREF: Regex = Regex::new(r#"href=["']([^"']+)["']"#).unwrap();
}

/// Flat, fully-populated view of one page.
///
/// Derived whenever a page is rendered; the page and document pair stays
/// the source of truth, this snapshot is never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// Gallery thumbnail (bounded 200x200)
    pub image_url: String,
    /// Tile-source descriptor for the deep-zoom viewer
    pub info_url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub collection: String,
    pub attribution: String,
    /// Landing page for the item
    pub link: String,
    /// Georeferencing editor pre-loaded with the owning manifest
    pub external_link: String,
}

/// Resolve every display field for `page` within `document`.
///
/// `image` must already be located; resolution itself cannot fail, since
/// absent metadata degrades to the field's fallback literal.
pub fn resolve_record(document: &Document, page: &Page, image: &ImageSource) -> DisplayRecord {
    let resolver = Resolver {
        version: IiifVersion::detect(document),
        document,
        page,
    };
    DisplayRecord {
        image_url: image.thumbnail_url(ThumbnailSpec::GALLERY),
        info_url: image.info_url(),
        title: resolver.title(),
        author: resolver.author(),
        date: resolver.date(),
        collection: resolver.collection(),
        attribution: resolver.attribution(),
        link: resolver.link(),
        external_link: resolver.external_link(),
    }
}

/// Document label for picker and listing surfaces.
pub fn document_label(document: &Document) -> String {
    document
        .label
        .as_ref()
        .and_then(TextValue::first_string)
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| "Untitled Manifest".to_string())
}

/// Page label for picker surfaces; unlabeled pages are numbered.
pub fn page_label(page: &Page, index: usize) -> String {
    page.label
        .as_ref()
        .and_then(TextValue::first_string)
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| format!("Page {}", index + 1))
}

struct Resolver<'a> {
    version: IiifVersion,
    document: &'a Document,
    page: &'a Page,
}

impl Resolver<'_> {
    fn from_page(&self, label: &str) -> Option<String> {
        present(lookup(&self.page.metadata, label, MatchPick::First))
    }

    fn from_document(&self, label: &str) -> Option<String> {
        present(lookup(&self.document.metadata, label, MatchPick::First))
    }

    /// Page entries outrank document entries for the same label.
    fn either(&self, label: &str) -> Option<String> {
        self.from_page(label).or_else(|| self.from_document(label))
    }

    /// Metadata "Title" wins over the structural label field.
    fn title(&self) -> String {
        self.either("Title")
            .or_else(|| present(self.document.label.as_ref().and_then(TextValue::first_string)))
            .unwrap_or_else(|| NO_TITLE.to_string())
    }

    fn author(&self) -> String {
        [
            "Creator",
            "Contributors",
            "Author",
            "Contributor",
            "Publisher",
            "Artist/Maker",
        ]
        .iter()
        .find_map(|label| self.either(label))
        .unwrap_or_else(|| NO_AUTHOR.to_string())
    }

    fn date(&self) -> String {
        self.from_page("Date")
            .or_else(|| self.from_document("Date"))
            .or_else(|| self.from_document("Created Published"))
            .or_else(|| self.either("Issued"))
            .or_else(|| self.either("Date made"))
            .or_else(|| self.either("Publication Date"))
            .or_else(|| self.from_page("Associated date"))
            .or_else(|| self.from_document("Associated date"))
            .unwrap_or_else(|| NO_DATE.to_string())
    }

    fn collection(&self) -> String {
        let generic = self
            .from_page("Location")
            .or_else(|| self.from_document("Location"))
            .or_else(|| self.from_document("Collection"))
            .or_else(|| self.from_page("Collection"))
            .or_else(|| self.from_page("Data Source"))
            .or_else(|| self.from_document("Data Source"));
        // Internet Archive manifests name the holding library in
        // Contributor; on v3 it outranks any generic match.
        let resolved = match self.version {
            IiifVersion::V3 => self
                .from_document("Contributor")
                .or_else(|| self.from_page("Contributor"))
                .or(generic),
            IiifVersion::V2 => generic,
        };
        resolved.unwrap_or_else(|| NO_COLLECTION.to_string())
    }

    fn attribution(&self) -> String {
        match self.version {
            IiifVersion::V3 => {
                let provider = self
                    .document
                    .provider
                    .first()
                    .and_then(|provider| provider.label.as_ref())
                    .and_then(TextValue::first_string);
                let statement = self
                    .document
                    .required_statement
                    .as_ref()
                    .and_then(|statement| statement.value.as_ref())
                    .and_then(TextValue::first_string);
                present(statement)
                    .or_else(|| present(provider))
                    .unwrap_or_else(|| NO_ATTRIBUTION.to_string())
            }
            // Repository and publisher entries outrank the document
            // field; a bare URL is never shown as attribution.
            IiifVersion::V2 => not_url(self.from_page("Repository"))
                .or_else(|| not_url(self.from_document("Repository")))
                .or_else(|| not_url(self.from_page("Digital Publisher")))
                .or_else(|| not_url(self.from_document("Digital Publisher")))
                .or_else(|| {
                    not_url(present(
                        self.document
                            .attribution
                            .as_ref()
                            .and_then(TextValue::first_string),
                    ))
                })
                .unwrap_or_else(|| NO_ATTRIBUTION.to_string()),
        }
    }

    fn link(&self) -> String {
        let structural = match self.version {
            IiifVersion::V3 => self
                .document
                .homepage
                .first()
                .and_then(|homepage| homepage.id.clone()),
            IiifVersion::V2 => self.document.related.as_ref().and_then(Related::url),
        };
        let resolved = present(structural)
            .or_else(|| self.embedded_source_href())
            .or_else(|| self.from_page("Identifier"))
            .or_else(|| present(lookup(&self.document.metadata, "Identifier", MatchPick::Last)))
            .or_else(|| self.from_page("Item Url"))
            .or_else(|| self.from_document("Item Url"))
            .or_else(|| self.from_document("identifier-access"))
            .or_else(|| self.page.identifier().map(str::to_string));
        match resolved {
            Some(link) => ensure_absolute(link),
            None => NO_LINK.to_string(),
        }
    }

    /// LUNA-style manifests bury the landing page in a "Source" entry as
    /// an HTML anchor; pull the href out of it.
    fn embedded_source_href(&self) -> Option<String> {
        let source = self.either("Source")?;
        EMBEDDED_HREF
            .captures(&source)
            .map(|caps| caps[1].to_string())
    }

    fn external_link(&self) -> String {
        match self.document.identifier() {
            Some(id) => format!(
                "https://editor.allmaps.org/?url={}",
                urlencoding::encode(id)
            ),
            None => NO_LINK.to_string(),
        }
    }
}

/// Empty and whitespace-only values lose their place in a chain.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn not_url(value: Option<String>) -> Option<String> {
    value.filter(|text| !ABSOLUTE_URL.is_match(text))
}

fn ensure_absolute(link: String) -> String {
    if ABSOLUTE_URL.is_match(&link) {
        link
    } else {
        format!("https://{link}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn page(value: serde_json::Value) -> Page {
        serde_json::from_value(value).unwrap()
    }

    fn record(doc: &Document, pg: &Page) -> DisplayRecord {
        let image = ImageSource::new("https://img.example/iiif/x");
        resolve_record(doc, pg, &image)
    }

    #[test]
    fn every_field_is_populated_for_an_empty_pair() {
        let rec = record(&document(json!({})), &page(json!({})));
        assert_eq!(rec.title, NO_TITLE);
        assert_eq!(rec.author, NO_AUTHOR);
        assert_eq!(rec.date, NO_DATE);
        assert_eq!(rec.collection, NO_COLLECTION);
        assert_eq!(rec.attribution, NO_ATTRIBUTION);
        assert_eq!(rec.link, NO_LINK);
        assert_eq!(rec.external_link, NO_LINK);
        assert_eq!(rec.image_url, "https://img.example/iiif/x/full/!200,200/0/default.jpg");
        assert_eq!(rec.info_url, "https://img.example/iiif/x/info.json");
    }

    #[test]
    fn title_falls_back_to_the_document_label() {
        let doc = document(json!({
            "@context": "http://iiif.io/api/presentation/3/context.json",
            "label": { "en": ["Map of Rome"] }
        }));
        assert_eq!(record(&doc, &page(json!({}))).title, "Map of Rome");
    }

    #[test]
    fn metadata_title_overrides_the_document_label() {
        let doc = document(json!({
            "label": "structural label",
            "metadata": [{ "label": "Title", "value": "metadata title" }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).title, "metadata title");
    }

    #[test]
    fn page_metadata_outranks_document_metadata() {
        let doc = document(json!({
            "metadata": [{ "label": "Date", "value": "1900" }]
        }));
        let pg = page(json!({
            "metadata": [{ "label": "Date", "value": "1885" }]
        }));
        assert_eq!(record(&doc, &pg).date, "1885");
    }

    #[test]
    fn author_chain_walks_the_institution_vocabulary() {
        let doc = document(json!({
            "metadata": [
                { "label": "Publisher", "value": "Rand McNally" },
                { "label": "Artist/Maker", "value": "Unknown" }
            ]
        }));
        assert_eq!(record(&doc, &page(json!({}))).author, "Rand McNally");
    }

    #[test]
    fn museum_date_vocabulary_is_recognized() {
        let doc = document(json!({
            "metadata": [{ "label": "Date made", "value": "ca. 1750" }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).date, "ca. 1750");
    }

    #[test]
    fn contributor_overrides_collection_on_v3_only() {
        let base = json!({
            "metadata": [
                { "label": "Collection", "value": "General Maps" },
                { "label": "Contributor", "value": "Internet Archive" }
            ]
        });
        let mut v3 = base.clone();
        v3["@context"] = json!("http://iiif.io/api/presentation/3/context.json");
        assert_eq!(record(&document(v3), &page(json!({}))).collection, "Internet Archive");

        let mut v2 = base;
        v2["@context"] = json!("http://iiif.io/api/presentation/2/context.json");
        assert_eq!(record(&document(v2), &page(json!({}))).collection, "General Maps");
    }

    #[test]
    fn v2_bare_url_attribution_is_rejected() {
        let doc = document(json!({
            "@context": "http://iiif.io/api/presentation/2/context.json",
            "attribution": "http://example.org"
        }));
        assert_eq!(record(&doc, &page(json!({}))).attribution, NO_ATTRIBUTION);
    }

    #[test]
    fn v2_repository_outranks_the_attribution_field() {
        let doc = document(json!({
            "@context": "http://iiif.io/api/presentation/2/context.json",
            "attribution": "Provided by the Example Library",
            "metadata": [{ "label": "Repository", "value": "Map Division" }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).attribution, "Map Division");
    }

    #[test]
    fn v3_required_statement_overrides_provider() {
        let doc = document(json!({
            "@context": "http://iiif.io/api/presentation/3/context.json",
            "provider": [{ "label": { "en": ["Library of Congress"] } }],
            "requiredStatement": {
                "label": { "en": ["Attribution"] },
                "value": { "en": ["Courtesy of LOC"] }
            }
        }));
        assert_eq!(record(&doc, &page(json!({}))).attribution, "Courtesy of LOC");
    }

    #[test]
    fn v3_provider_label_stands_alone() {
        let doc = document(json!({
            "@context": "http://iiif.io/api/presentation/3/context.json",
            "provider": [{ "label": { "en": ["Library of Congress"] } }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).attribution, "Library of Congress");
    }

    #[test]
    fn link_prefers_the_structural_fields() {
        let v3 = document(json!({
            "@context": "http://iiif.io/api/presentation/3/context.json",
            "homepage": [{ "id": "https://www.loc.gov/item/2012592452" }],
            "metadata": [{ "label": "Identifier", "value": "ignored" }]
        }));
        assert_eq!(
            record(&v3, &page(json!({}))).link,
            "https://www.loc.gov/item/2012592452"
        );

        let v2 = document(json!({
            "@context": "http://iiif.io/api/presentation/2/context.json",
            "related": { "@id": "https://www.davidrumsey.com/maps1.html" }
        }));
        assert_eq!(
            record(&v2, &page(json!({}))).link,
            "https://www.davidrumsey.com/maps1.html"
        );
    }

    #[test]
    fn link_extracts_href_from_a_source_anchor() {
        let doc = document(json!({
            "metadata": [{
                "label": "Source",
                "value": "<a href='https://luna.example/detail/123'>View source record</a>"
            }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).link, "https://luna.example/detail/123");
    }

    #[test]
    fn last_identifier_wins_at_document_level() {
        let doc = document(json!({
            "metadata": [
                { "label": "Identifier", "value": "g3700.ct000001" },
                { "label": "Identifier", "value": "https://lccn.loc.gov/2012592452" }
            ]
        }));
        assert_eq!(record(&doc, &page(json!({}))).link, "https://lccn.loc.gov/2012592452");
    }

    #[test]
    fn page_identifier_wins_over_document_identifiers() {
        let doc = document(json!({
            "metadata": [{ "label": "Identifier", "value": "doc-level" }]
        }));
        let pg = page(json!({
            "metadata": [{ "label": "Identifier", "value": "page-level" }]
        }));
        assert_eq!(record(&doc, &pg).link, "https://page-level");
    }

    #[test]
    fn relative_links_are_coerced_to_https() {
        let doc = document(json!({
            "metadata": [{ "label": "identifier-access", "value": "archive.org/details/item42" }]
        }));
        assert_eq!(record(&doc, &page(json!({}))).link, "https://archive.org/details/item42");
    }

    #[test]
    fn canvas_uri_is_the_last_real_fallback() {
        let pg = page(json!({ "@id": "https://example.org/canvas/7" }));
        assert_eq!(record(&document(json!({})), &pg).link, "https://example.org/canvas/7");
    }

    #[test]
    fn external_link_url_encodes_the_manifest_uri() {
        let doc = document(json!({ "@id": "https://example.org/iiif/manifest.json" }));
        assert_eq!(
            record(&doc, &page(json!({}))).external_link,
            "https://editor.allmaps.org/?url=https%3A%2F%2Fexample.org%2Fiiif%2Fmanifest.json"
        );
    }

    #[test]
    fn picker_labels_fall_back_sensibly() {
        assert_eq!(document_label(&document(json!({}))), "Untitled Manifest");
        assert_eq!(
            document_label(&document(json!({ "label": { "none": ["Atlas"] } }))),
            "Atlas"
        );
        assert_eq!(page_label(&page(json!({})), 2), "Page 3");
        assert_eq!(page_label(&page(json!({ "label": "Plate IV" })), 2), "Plate IV");
    }
}
