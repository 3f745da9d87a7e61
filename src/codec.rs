//! Conversion between delimiter-joined text and collections of [`Element`]s.
//!
//! Decoding is all-or-nothing: the first segment that fails to parse fails the
//! whole decode, and no partial collection is returned. The empty string
//! decodes to an empty collection.
//!
//! Sets encode their members sorted by their *text* form, so that equal sets
//! always encode to identical strings. This is a string ordering, not a
//! numeric one: `{-3, 1, 20, 4}` encodes as "-3,1,20,4".

use crate::element::{Element, ElementError};
use std::collections::HashSet;
use std::hash::Hash;

/// A segment of a delimited value failed to parse
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid element at index {index} ({segment:?}): {source}")]
pub struct DecodeError {
    /// Zero-based position of the segment
    pub index: usize,
    /// The segment text
    pub segment: String,
    /// Why the segment was rejected
    #[source]
    pub source: ElementError,
}

// An empty delimiter means the whole text is one segment.
fn segments<'s>(raw: &'s str, delimiter: &'s str) -> Box<dyn Iterator<Item = &'s str> + 's> {
    if raw.is_empty() {
        Box::new(std::iter::empty())
    } else if delimiter.is_empty() {
        Box::new(std::iter::once(raw))
    } else {
        Box::new(raw.split(delimiter))
    }
}

fn decode_each<'s, T: Element>(
    raw: &'s str,
    delimiter: &'s str,
) -> impl Iterator<Item = Result<T, DecodeError>> + 's {
    segments(raw, delimiter)
        .enumerate()
        .map(|(index, segment)| {
            T::decode(segment).map_err(|source| DecodeError {
                index,
                segment: segment.to_owned(),
                source,
            })
        })
}

/// Decode an ordered sequence. Duplicates and input order are kept.
pub fn decode_slice<T: Element>(raw: &str, delimiter: &str) -> Result<Vec<T>, DecodeError> {
    decode_each(raw, delimiter).collect()
}

/// Decode a set. Later duplicates collapse into earlier ones.
pub fn decode_set<T: Element + Eq + Hash>(
    raw: &str,
    delimiter: &str,
) -> Result<HashSet<T>, DecodeError> {
    decode_each(raw, delimiter).collect()
}

/// Encode an ordered sequence, keeping element order
pub fn encode_slice<T: Element>(values: &[T], delimiter: &str) -> String {
    values
        .iter()
        .map(Element::encode)
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Encode a set, with members sorted lexicographically by their text form
pub fn encode_set<T: Element>(values: &HashSet<T>, delimiter: &str) -> String {
    let mut texts = values.iter().map(Element::encode).collect::<Vec<_>>();
    texts.sort();
    texts.join(delimiter)
}
