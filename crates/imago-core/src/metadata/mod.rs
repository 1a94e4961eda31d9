//! Metadata lookup and display-field resolution

mod lookup;
mod resolve;

pub use lookup::{lookup, MatchPick};
pub use resolve::{
    document_label, page_label, resolve_record, DisplayRecord, NO_ATTRIBUTION, NO_AUTHOR,
    NO_COLLECTION, NO_DATE, NO_LINK, NO_TITLE,
};
