//! Best-match retrieval from description-entry lists

use crate::manifest::{DescriptionEntry, TextValue};

/// Which entry wins when a label occurs more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPick {
    /// First matching entry, the usual choice
    #[default]
    First,
    /// Last matching entry. Some producers repeat "Identifier" with the
    /// most specific value last.
    Last,
}

/// Find a metadata value by label name, case-insensitively.
///
/// An entry matches when any flattened candidate of its label equals
/// `name`, so a v3 label map matches through any of its languages. The
/// chosen entry's value resolves down to a single string; `None` means
/// no entry matched, or the matched value resolved to nothing.
pub fn lookup(entries: &[DescriptionEntry], name: &str, pick: MatchPick) -> Option<String> {
    let wanted = name.to_lowercase();
    let mut matches = entries.iter().filter(|entry| {
        entry.label.as_ref().is_some_and(|label| {
            label
                .candidates()
                .iter()
                .any(|candidate| candidate.to_lowercase() == wanted)
        })
    });
    let entry = match pick {
        MatchPick::First => matches.next(),
        MatchPick::Last => matches.last(),
    }?;
    entry.value.as_ref().and_then(TextValue::first_string)
}
