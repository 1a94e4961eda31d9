//! Error types for imago-core

use thiserror::Error;

use crate::http::HttpError;
use crate::manifest::IiifVersion;

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Main error type for gallery operations
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Loading or parsing a document failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Producing an export artifact failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors raised while loading manifests and collection files
#[derive(Error, Debug)]
pub enum LoadError {
    /// The body was not valid JSON
    #[error("Invalid JSON: {message}")]
    Parse { message: String },

    /// Non-success HTTP status fetching a remote document
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    /// The request itself failed (DNS, connect, TLS, timeout)
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// The version-keyed page container is missing or unusable
    #[error("{version} manifest does not contain pages in the expected format")]
    MissingPages { version: IiifVersion },

    /// A gallery file whose member list is missing or not a list
    #[error("no valid items found in the collection document")]
    NotACollection,
}

impl From<HttpError> for LoadError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::RequestFailed { message } => LoadError::Transport { message },
        }
    }
}

/// Errors raised while producing export artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export requested with nothing in the gallery
    #[error("no pages to export")]
    EmptyGallery,

    /// Gallery state did not serialize
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
