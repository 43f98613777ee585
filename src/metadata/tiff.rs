//! TIFF block location and parsing
//!
//! Image formats embed their metadata as a TIFF block: JPEG in an APP1
//! segment, PNG in an `eXIf` chunk, HEIF in an `Exif` item. Rather than
//! walking each container, the file is searched for the first plausible
//! TIFF header and the block from there on is handed to kamadak-exif.

use super::MetadataError;
use exif::{Exif, Reader};
use tracing::{debug, warn};

const HEADER_LEN: usize = 8;

/// Search a file buffer for the first valid TIFF header
///
/// A byte-order marker whose first-directory offset points outside the
/// buffer is treated as a coincidence and the search continues.
pub fn locate(bytes: &[u8]) -> Option<&[u8]> {
    let mut from = 0;
    while from + HEADER_LEN <= bytes.len() {
        let pos = from
            + bytes[from..]
                .windows(4)
                .position(|w| w == b"II*\0" || w == b"MM\0*")?;
        let block = &bytes[pos..];
        if first_directory_in_range(block) {
            debug!(offset = pos, "Found TIFF header");
            return Some(block);
        }
        from = pos + 1;
    }
    None
}

/// Whether the header's first-directory offset lands on an entry count
fn first_directory_in_range(block: &[u8]) -> bool {
    let Some(raw) = block.get(4..HEADER_LEN).and_then(|b| <[u8; 4]>::try_from(b).ok()) else {
        return false;
    };
    let offset = match &block[..2] {
        b"II" => u32::from_le_bytes(raw),
        _ => u32::from_be_bytes(raw),
    } as usize;
    offset >= HEADER_LEN && block.get(offset..).is_some_and(|dir| dir.len() >= 2)
}

/// Parse a located TIFF block
///
/// Fields that cannot be read, and directories that break off midway, are
/// logged and left out. Only a block with no readable structure at all is
/// an error.
pub fn read(block: &[u8]) -> Result<Exif, MetadataError> {
    match Reader::new().continue_on_error(true).read_raw(block.to_vec()) {
        Ok(exif) => Ok(exif),
        Err(exif::Error::PartialResult(partial)) => {
            let (exif, errors) = partial.into_inner();
            for e in &errors {
                warn!(error = %e, "Skipping unreadable metadata");
            }
            Ok(exif)
        }
        Err(e) => Err(MetadataError::Container(e)),
    }
}
