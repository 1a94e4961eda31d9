//! Image-service location and URL derivation
//!
//! A page renders only through its image service. The service base URI
//! sits at different structural paths in the two schema generations and
//! may use either naming convention; everything after location is fixed
//! suffix templates on that URI.

use serde::{Deserialize, Serialize};

use crate::manifest::{IiifVersion, Page};

/// Bounding box for best-fit (`!w,h`) image requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSpec {
    /// Gallery card size
    pub const GALLERY: ThumbnailSpec = ThumbnailSpec {
        width: 200,
        height: 200,
    };
    /// Page-picker grid size
    pub const PICKER: ThumbnailSpec = ThumbnailSpec {
        width: 150,
        height: 150,
    };
}

/// The located image service for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Image API base URI; request URLs are derived by suffix
    pub service_id: String,
}

impl ImageSource {
    pub fn new(service_id: &str) -> ImageSource {
        ImageSource {
            service_id: service_id.to_string(),
        }
    }

    /// Bounded thumbnail, aspect ratio preserved.
    pub fn thumbnail_url(&self, spec: ThumbnailSpec) -> String {
        format!(
            "{}/full/!{},{}/0/default.jpg",
            self.service_id, spec.width, spec.height
        )
    }

    /// Tile-source descriptor for the deep-zoom viewer.
    pub fn info_url(&self) -> String {
        format!("{}/info.json", self.service_id)
    }
}

/// Locate the image service for `page`.
///
/// v3 looks at the first annotation body of the first annotation page;
/// v2 at the first image annotation's resource. `None` means the
/// annotation, its body, the service, or the identifier is absent;
/// callers skip such pages with a diagnostic instead of failing the
/// whole document.
pub fn locate(page: &Page, version: IiifVersion) -> Option<ImageSource> {
    let service = match version {
        IiifVersion::V3 => page
            .items
            .first()?
            .items
            .first()?
            .body
            .as_ref()?
            .service
            .as_ref()?
            .primary(),
        IiifVersion::V2 => page
            .images
            .first()?
            .resource
            .as_ref()?
            .service
            .as_ref()?
            .primary(),
    }?;
    service.identifier().map(ImageSource::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(value: serde_json::Value) -> Page {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn locates_a_v2_service() {
        let pg = page(json!({
            "images": [{
                "resource": {
                    "service": { "@id": "https://ids.si.edu/iiif/NMAH-1", "profile": "level2" }
                }
            }]
        }));
        let source = locate(&pg, IiifVersion::V2).unwrap();
        assert_eq!(source.service_id, "https://ids.si.edu/iiif/NMAH-1");
    }

    #[test]
    fn locates_a_v3_service() {
        let pg = page(json!({
            "items": [{
                "items": [{
                    "body": {
                        "service": [{ "id": "https://tile.loc.gov/image-services/iiif/svc1" }]
                    }
                }]
            }]
        }));
        let source = locate(&pg, IiifVersion::V3).unwrap();
        assert_eq!(source.service_id, "https://tile.loc.gov/image-services/iiif/svc1");
    }

    #[test]
    fn v2_service_written_as_a_list_still_locates() {
        let pg = page(json!({
            "images": [{
                "resource": {
                    "service": [
                        { "@id": "https://img.example/first" },
                        { "@id": "https://img.example/second" }
                    ]
                }
            }]
        }));
        let source = locate(&pg, IiifVersion::V2).unwrap();
        assert_eq!(source.service_id, "https://img.example/first");
    }

    #[test]
    fn service_without_any_identifier_is_none() {
        let pg = page(json!({
            "items": [{
                "items": [{
                    "body": { "service": [{ "profile": "level1" }] }
                }]
            }]
        }));
        assert_eq!(locate(&pg, IiifVersion::V3), None);
    }

    #[test]
    fn structural_absence_is_none_not_a_panic() {
        assert_eq!(locate(&page(json!({})), IiifVersion::V2), None);
        assert_eq!(locate(&page(json!({})), IiifVersion::V3), None);
        assert_eq!(
            locate(&page(json!({ "items": [{ "items": [] }] })), IiifVersion::V3),
            None
        );
        assert_eq!(
            locate(&page(json!({ "images": [{}] })), IiifVersion::V2),
            None
        );
    }

    #[test]
    fn derived_urls_follow_the_suffix_templates() {
        let source = ImageSource::new("https://img.example/iiif/743");
        assert_eq!(
            source.thumbnail_url(ThumbnailSpec::GALLERY),
            "https://img.example/iiif/743/full/!200,200/0/default.jpg"
        );
        assert_eq!(
            source.thumbnail_url(ThumbnailSpec::PICKER),
            "https://img.example/iiif/743/full/!150,150/0/default.jpg"
        );
        assert_eq!(source.info_url(), "https://img.example/iiif/743/info.json");
    }
}
