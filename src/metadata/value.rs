//! Tag value decoding
//!
//! Turns a kamadak-exif [`Value`] into the closed [`TagValue`] the rest of
//! the crate works with. Numeric fields keep only their first element;
//! `UNDEFINED` fields are rendered for the handful of tags with a known
//! layout and left opaque otherwise.

use super::MetadataError;
use super::directory::{EXIF_PATH, INTEROP_PATH};
use exif::Value;
use serde::Serialize;
use std::fmt;

/// First element of a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Numeric {
    Unsigned(u32),
    Signed(i32),
    Rational(i64, i64),
    Float(f64),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Unsigned(v) => write!(f, "{v}"),
            Numeric::Signed(v) => write!(f, "{v}"),
            Numeric::Rational(n, d) => write!(f, "{n}/{d}"),
            Numeric::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Decoded tag value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Numeric(Numeric),
    /// `UNDEFINED` payload; `None` when no decoder exists for the tag
    Opaque(Option<String>),
}

impl TagValue {
    /// The value as text, only for `ASCII` fields
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Numeric(n) => n.fmt(f),
            TagValue::Opaque(Some(s)) => f.write_str(s),
            TagValue::Opaque(None) => Ok(()),
        }
    }
}

/// TIFF type id and name of a parsed value
///
/// Types kamadak-exif leaves unparsed are an error.
pub fn type_info(tag_id: u16, value: &Value) -> Result<(u16, &'static str), MetadataError> {
    Ok(match value {
        Value::Byte(_) => (1, "BYTE"),
        Value::Ascii(_) => (2, "ASCII"),
        Value::Short(_) => (3, "SHORT"),
        Value::Long(_) => (4, "LONG"),
        Value::Rational(_) => (5, "RATIONAL"),
        Value::SByte(_) => (6, "SBYTE"),
        Value::Undefined(..) => (7, "UNDEFINED"),
        Value::SShort(_) => (8, "SSHORT"),
        Value::SLong(_) => (9, "SLONG"),
        Value::SRational(_) => (10, "SRATIONAL"),
        Value::Float(_) => (11, "FLOAT"),
        Value::Double(_) => (12, "DOUBLE"),
        Value::Unknown(type_id, ..) => {
            return Err(MetadataError::UnknownType {
                tag_id,
                type_id: *type_id,
            });
        }
    })
}

/// Number of units the entry declared
///
/// ASCII strings are stored split at their terminators, so each one
/// counts its NUL back in.
pub fn unit_count(value: &Value) -> usize {
    match value {
        Value::Ascii(strings) => strings.iter().map(|s| s.len() + 1).sum(),
        Value::Byte(v) | Value::Undefined(v, _) => v.len(),
        Value::SByte(v) => v.len(),
        Value::Short(v) => v.len(),
        Value::SShort(v) => v.len(),
        Value::Long(v) => v.len(),
        Value::SLong(v) => v.len(),
        Value::Rational(v) => v.len(),
        Value::SRational(v) => v.len(),
        Value::Float(v) => v.len(),
        Value::Double(v) => v.len(),
        Value::Unknown(_, count, _) => *count as usize,
    }
}

/// Decode the value of one field
pub fn decode(ifd_path: &str, tag_id: u16, value: &Value) -> Result<TagValue, MetadataError> {
    let numeric = match value {
        Value::Ascii(strings) => {
            let text = strings
                .first()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .unwrap_or_default();
            return Ok(TagValue::Text(text));
        }
        Value::Undefined(bytes, _) => {
            return decode_undefined(ifd_path, tag_id, bytes).map(TagValue::Opaque);
        }
        Value::Unknown(type_id, ..) => {
            return Err(MetadataError::UnknownType {
                tag_id,
                type_id: *type_id,
            });
        }
        Value::Byte(v) => v.first().map(|&x| Numeric::Unsigned(x.into())),
        Value::Short(v) => v.first().map(|&x| Numeric::Unsigned(x.into())),
        Value::Long(v) => v.first().map(|&x| Numeric::Unsigned(x)),
        Value::SByte(v) => v.first().map(|&x| Numeric::Signed(x.into())),
        Value::SShort(v) => v.first().map(|&x| Numeric::Signed(x.into())),
        Value::SLong(v) => v.first().map(|&x| Numeric::Signed(x)),
        Value::Rational(v) => v
            .first()
            .map(|r| Numeric::Rational(r.num.into(), r.denom.into())),
        Value::SRational(v) => v
            .first()
            .map(|r| Numeric::Rational(r.num.into(), r.denom.into())),
        Value::Float(v) => v.first().map(|&x| Numeric::Float(x.into())),
        Value::Double(v) => v.first().map(|&x| Numeric::Float(x)),
    };

    numeric.map(TagValue::Numeric).ok_or(MetadataError::Undecodable {
        tag_id,
        reason: "no elements",
    })
}

/// Decode the `UNDEFINED` tags with a known layout
///
/// Tags without a decoder are not an error and yield `None`. A known tag
/// whose payload is too short to hold its layout is.
fn decode_undefined(
    ifd_path: &str,
    tag_id: u16,
    raw: &[u8],
) -> Result<Option<String>, MetadataError> {
    let short = |reason| MetadataError::Undecodable { tag_id, reason };

    match (ifd_path, tag_id) {
        // ExifVersion, FlashpixVersion, InteroperabilityVersion
        (EXIF_PATH, 0x9000) | (EXIF_PATH, 0xa000) | (INTEROP_PATH, 0x0002) => {
            let version = raw.get(..4).ok_or_else(|| short("version shorter than 4 bytes"))?;
            Ok(Some(String::from_utf8_lossy(version).into_owned()))
        }
        // ComponentsConfiguration
        (EXIF_PATH, 0x9101) => {
            let components = raw.get(..4).ok_or_else(|| short("fewer than 4 components"))?;
            let names: String = components
                .iter()
                .map(|c| match c {
                    0 => "",
                    1 => "Y",
                    2 => "Cb",
                    3 => "Cr",
                    4 => "R",
                    5 => "G",
                    6 => "B",
                    _ => "?",
                })
                .collect();
            Ok(Some(names))
        }
        // UserComment: 8-byte character code, then the text
        (EXIF_PATH, 0x9286) => {
            let text = raw.get(8..).ok_or_else(|| short("missing character code"))?;
            let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
            Ok(Some(String::from_utf8_lossy(&text[..end]).trim_end().to_string()))
        }
        // FileSource, SceneType
        (EXIF_PATH, 0xa300) | (EXIF_PATH, 0xa301) => {
            let first = raw.first().ok_or_else(|| short("empty payload"))?;
            Ok(Some(first.to_string()))
        }
        _ => Ok(None),
    }
}
