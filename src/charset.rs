//! Page character encodings.
//!
//! Pages are decoded in the encoding they declare and written back in the
//! same encoding, so a `windows-1251` page stays a `windows-1251` page:
//!
//! ```text
//! 1. Byte order mark       EF BB BF / FF FE / FE FF
//! 2. <meta charset=…>      or <meta http-equiv content="…; charset=…">
//! 3. UTF-8                 when nothing is declared
//! ```
//!
//! Bytes that are invalid in the chosen encoding are an error, never
//! replacement characters. Characters the encoding cannot represent on the
//! way out (such as `×` in `windows-1251`) become numeric character
//! references.

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

/// How far into the page the `<meta>` declaration is looked for.
const PRESCAN_LEN: usize = 1024;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
#[error("page is not valid {encoding}")]
pub struct DecodeError {
    pub encoding: &'static str,
}

/// A page's text together with how to write it back.
#[derive(Debug, Clone)]
pub struct DecodedPage {
    pub html: String,
    pub encoding: &'static Encoding,
    /// The source started with a byte order mark.
    pub bom: bool,
}

impl DecodedPage {
    /// Encode `html` the way the source page was encoded.
    pub fn encode(&self, html: &str) -> Vec<u8> {
        let (bytes, written_as, _) = self.encoding.encode(html);
        // UTF-16 sources come back as UTF-8; keep a BOM so the declared
        // charset does not win over it.
        if self.bom && written_as == UTF_8 {
            let mut out = UTF8_BOM.to_vec();
            out.extend_from_slice(&bytes);
            out
        } else {
            bytes.into_owned()
        }
    }
}

/// Decode raw page bytes.
pub fn decode_page(bytes: &[u8]) -> Result<DecodedPage, DecodeError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let html = decode_strict(encoding, &bytes[bom_len..])?;
        return Ok(DecodedPage {
            html,
            encoding,
            bom: true,
        });
    }
    let encoding = declared_charset(bytes).unwrap_or(UTF_8);
    Ok(DecodedPage {
        html: decode_strict(encoding, bytes)?,
        encoding,
        bom: false,
    })
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, DecodeError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(DecodeError {
            encoding: encoding.name(),
        })
}

/// The charset named by the first `charset=` in the page head.
///
/// A declared UTF-16 is read as UTF-8: without a BOM the bytes are
/// ASCII-compatible, or the declaration could not have been found.
pub fn declared_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(PRESCAN_LEN)];
    let lower = head.to_ascii_lowercase();
    let at = lower.windows(8).position(|w| w == b"charset=")? + 8;

    let rest = &head[at..];
    let rest = rest
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&rest[rest.len()..], |start| &rest[start..]);
    let rest = match rest.first() {
        Some(b'"' | b'\'') => &rest[1..],
        _ => rest,
    };
    let end = rest
        .iter()
        .position(|b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(rest.len());

    let encoding = Encoding::for_label(&rest[..end])?;
    if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
        Some(UTF_8)
    } else {
        Some(encoding)
    }
}
