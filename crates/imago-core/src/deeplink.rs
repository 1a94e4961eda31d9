//! Deep-link loading: start a gallery from query parameters
//!
//! A hosted gallery page can be opened with `?file=<url>` (or `?url=`)
//! plus an optional `filename`. The referenced resource is fetched and
//! pushed through the normal collection-load path, so deep links behave
//! exactly like a local file selection.

use url::Url;

/// A normalized deep-link load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkRequest {
    /// Directly fetchable URL, hosting rewrites applied
    pub url: String,
    /// Name to present for the synthesized file selection
    pub filename: String,
}

impl DeepLinkRequest {
    /// Read `file`/`url` (and optional `filename`) from a query string.
    /// `None` when no file parameter is present: a plain page open.
    pub fn from_query(query: &str) -> Option<DeepLinkRequest> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let raw = pairs
            .iter()
            .find(|(key, _)| key == "file")
            .or_else(|| pairs.iter().find(|(key, _)| key == "url"))
            .map(|(_, value)| value.clone())?;
        let url = normalize_file_url(&raw);
        let filename = pairs
            .iter()
            .find(|(key, _)| key == "filename")
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| derive_filename(&url));
        Some(DeepLinkRequest { url, filename })
    }

    /// Extract the request from a full page URL.
    pub fn from_url(page_url: &str) -> Option<DeepLinkRequest> {
        let parsed = Url::parse(page_url).ok()?;
        Self::from_query(parsed.query().unwrap_or(""))
    }
}

/// Rewrite a GitHub web-UI blob URL to its raw-content equivalent.
/// Anything else passes through untouched, including unparseable input.
pub fn normalize_file_url(input: &str) -> String {
    let Ok(url) = Url::parse(input) else {
        return input.to_string();
    };
    if url.host_str() != Some("github.com") {
        return input.to_string();
    }
    let parts: Vec<&str> = url.path().split('/').collect();
    let Some(blob_index) = parts.iter().position(|part| *part == "blob") else {
        return input.to_string();
    };
    let mut kept = parts;
    kept.remove(blob_index);
    format!("https://raw.githubusercontent.com{}", kept.join("/"))
}

/// Last path segment of the URL, percent-decoded; `download.json` when
/// there is no usable segment or the input is not a URL.
pub fn derive_filename(input: &str) -> String {
    let fallback = || "download.json".to_string();
    let Ok(url) = Url::parse(input) else {
        return fallback();
    };
    let base = url.path().rsplit('/').next().unwrap_or("");
    if base.is_empty() {
        return fallback();
    }
    match urlencoding::decode(base) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_parameter_is_preferred_over_url() {
        let request = DeepLinkRequest::from_query(
            "file=https%3A%2F%2Fexample.org%2Fgallery.json&url=https%3A%2F%2Fother.org%2Fx.json",
        )
        .unwrap();
        assert_eq!(request.url, "https://example.org/gallery.json");
        assert_eq!(request.filename, "gallery.json");
    }

    #[test]
    fn url_parameter_works_alone() {
        let request =
            DeepLinkRequest::from_query("url=https%3A%2F%2Fexample.org%2Fsaved%2Fmaps.json")
                .unwrap();
        assert_eq!(request.url, "https://example.org/saved/maps.json");
    }

    #[test]
    fn explicit_filename_overrides_derivation() {
        let request = DeepLinkRequest::from_query(
            "file=https%3A%2F%2Fexample.org%2Fblob.json&filename=my%20gallery.json",
        )
        .unwrap();
        assert_eq!(request.filename, "my gallery.json");
    }

    #[test]
    fn absent_file_parameter_is_a_plain_open() {
        assert_eq!(DeepLinkRequest::from_query(""), None);
        assert_eq!(DeepLinkRequest::from_query("theme=dark"), None);
    }

    #[test]
    fn reads_the_query_out_of_a_page_url() {
        let request = DeepLinkRequest::from_url(
            "https://viewer.example/index.html?file=https%3A%2F%2Fexample.org%2Fg.json",
        )
        .unwrap();
        assert_eq!(request.url, "https://example.org/g.json");
    }

    #[test]
    fn github_blob_urls_are_rewritten_to_raw() {
        assert_eq!(
            normalize_file_url("https://github.com/owner/repo/blob/main/galleries/texas.json"),
            "https://raw.githubusercontent.com/owner/repo/main/galleries/texas.json"
        );
    }

    #[test]
    fn non_blob_and_non_github_urls_pass_through() {
        let raw = "https://raw.githubusercontent.com/owner/repo/main/g.json";
        assert_eq!(normalize_file_url(raw), raw);

        let release = "https://github.com/owner/repo/releases/download/v1/g.json";
        assert_eq!(normalize_file_url(release), release);

        let other = "https://example.org/gallery.json";
        assert_eq!(normalize_file_url(other), other);

        assert_eq!(normalize_file_url("not a url"), "not a url");
    }

    #[test]
    fn filenames_decode_percent_escapes() {
        assert_eq!(
            derive_filename("https://example.org/files/my%20maps.json"),
            "my maps.json"
        );
    }

    #[test]
    fn filename_fallback_covers_bad_input() {
        assert_eq!(derive_filename("https://example.org/"), "download.json");
        assert_eq!(derive_filename("::::"), "download.json");
    }
}
