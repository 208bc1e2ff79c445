
//! Derive the header of an output container from the header of an input container.

use exr::meta::attribute::Text;
use super::{ChannelTable, HeaderMetadata, Views};


/// Appended to the comments of every header written by this crate.
pub const PROVENANCE_COMMENT: &str = "Processed by exrsplit";

/// Joins the previous comments and the provenance comment.
const COMMENT_SEPARATOR: &str = " - ";


/// Clone the input header without any channels and without a view declaration,
/// and mark it as processed. Applying this twice yields the same header as applying it once.
pub fn project_header(input: &HeaderMetadata) -> HeaderMetadata {
    HeaderMetadata {
        attributes: input.attributes.clone(),
        views: Views::None,
        comments: Some(append_provenance(input.comments.as_ref())),
        channels: ChannelTable::new(),
    }
}

fn append_provenance(comments: Option<&Text>) -> Text {
    let marker = PROVENANCE_COMMENT.as_bytes();

    match comments {
        None => Text::from(PROVENANCE_COMMENT),
        Some(previous) if contains_bytes(previous.as_slice(), marker) => previous.clone(),

        Some(previous) => {
            let mut bytes = previous.as_slice().to_vec();
            bytes.extend_from_slice(COMMENT_SEPARATOR.as_bytes());
            bytes.extend_from_slice(marker);
            Text::from_slice_unchecked(&bytes)
        }
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
