//! Binary signature file parser.
//!
//! Layout of a `.addon` signature blob: a 4-byte big-endian length `L`, then
//! `L` bytes of Windows-1252 publisher name, then arbitrary bytes up to an
//! embedded XML descriptor that runs to the end of the buffer. The XML start
//! is found by scanning for the literal `<addon>` marker; the byte order and
//! the scan are part of the format and must be reproduced exactly.

use byteorder::{BigEndian, ReadBytesExt};
use encoding_rs::WINDOWS_1252;
use serde::Deserialize;

use crate::types::AddonSignature;

const XML_MARKER: &[u8] = b"<addon>";

/// Embedded XML descriptor schema. `publisher` is deliberately absent: it
/// only ever comes from the binary preamble.
#[derive(Debug, Deserialize)]
struct SignatureXml {
    name: String,
    description: Option<String>,
    #[serde(default)]
    free: bool,
    #[serde(default)]
    files: FileList,
}

#[derive(Debug, Default, Deserialize)]
struct FileList {
    #[serde(rename = "file", default)]
    entries: Vec<String>,
}

/// Decode a signature blob into an [`AddonSignature`].
///
/// Pure transform; truncated or malformed input yields an `Err`, never a
/// panic.
pub fn parse_signature(buffer: &[u8]) -> Result<AddonSignature, String> {
    if buffer.len() < 4 {
        return Err(format!(
            "Signature too short: {} bytes, need at least 4",
            buffer.len()
        ));
    }

    let mut preamble = &buffer[..4];
    let publisher_len = preamble
        .read_u32::<BigEndian>()
        .map_err(|e| format!("Failed to read publisher length: {e}"))? as usize;
    let publisher_end = 4usize
        .checked_add(publisher_len)
        .filter(|end| *end <= buffer.len())
        .ok_or_else(|| {
            format!(
                "Signature truncated: publisher length {publisher_len} exceeds {} remaining bytes",
                buffer.len() - 4
            )
        })?;
    let (publisher, _, _) = WINDOWS_1252.decode(&buffer[4..publisher_end]);

    let xml_start = find_marker(buffer, publisher_end)
        .ok_or_else(|| "Signature descriptor marker <addon> not found".to_string())?;
    let xml = std::str::from_utf8(&buffer[xml_start..])
        .map_err(|e| format!("Signature descriptor is not valid UTF-8: {e}"))?;
    let parsed: SignatureXml = quick_xml::de::from_str(xml)
        .map_err(|e| format!("Failed to parse signature descriptor: {e}"))?;

    Ok(AddonSignature {
        name: parsed.name,
        description: parsed.description,
        free: parsed.free,
        referenced_files: parsed.files.entries,
        publisher: publisher.into_owned(),
    })
}

/// Scan forward from `from`, testing each `<` byte as the possible start of
/// the full marker literal.
fn find_marker(buffer: &[u8], from: usize) -> Option<usize> {
    if from >= buffer.len() {
        return None;
    }
    let mut pos = from;
    while pos + XML_MARKER.len() <= buffer.len() {
        if buffer[pos] == b'<' && &buffer[pos..pos + XML_MARKER.len()] == XML_MARKER {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

#[cfg(test)]
#[path = "tests/signature_tests.rs"]
mod tests;
