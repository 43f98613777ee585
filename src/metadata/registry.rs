//! Tag name registry
//!
//! Names come from the kamadak-exif tag table. Tags missing from the table
//! are vendor or private tags and are ignored by the extractor.

use exif::Tag;

/// Look up the registered name of a tag
pub fn tag_name(tag: Tag) -> Option<String> {
    // Only registered tags carry a description
    tag.description()?;
    Some(tag.to_string())
}
