//! Range list parser for gallery directives.
//!
//! A gallery body is a comma-separated list of numbers and inclusive
//! `start-end` ranges:
//!
//! ```text
//! "1-10, 12-15"  →  1 2 3 … 10 12 13 14 15
//! "3, 1-2"       →  3 1 2          (segment order is kept)
//! "5-3"          →  (nothing)      (reversed ranges are empty)
//! "x"            →  NaN            (bad numbers are kept, not rejected)
//! "1-99999"      →  (nothing)      (longer than MAX_RANGE_LEN)
//! ```
//!
//! Parsing never fails. Malformed numbers become [`GalleryIndex::NaN`], which
//! still flows into the generated image URL and produces a broken image
//! instead of an error. Numbers are read leniently: leading whitespace is
//! skipped, an optional sign is accepted, and the longest run of digits wins
//! (`"12abc"` reads as 12).

use std::fmt;

/// One entry produced by the range parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryIndex {
    Number(i64),
    /// A segment that did not start with a number.
    NaN,
}

impl fmt::Display for GalleryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryIndex::Number(n) => write!(f, "{n}"),
            GalleryIndex::NaN => f.write_str("NaN"),
        }
    }
}

impl GalleryIndex {
    pub fn as_number(self) -> Option<i64> {
        match self {
            GalleryIndex::Number(n) => Some(n),
            GalleryIndex::NaN => None,
        }
    }
}

/// Longest `start-end` range that is expanded. A longer range adds nothing,
/// like a reversed one.
pub const MAX_RANGE_LEN: u64 = 10_000;

/// Parse a range list into an ordered sequence of indices.
pub fn parse_ranges(text: &str) -> Vec<GalleryIndex> {
    let mut indices = Vec::new();
    for segment in text.split(',').map(str::trim) {
        if let Some((start, end)) = segment.split_once('-') {
            // A NaN endpoint never satisfies `start <= end`, so it adds nothing.
            if let (GalleryIndex::Number(start), GalleryIndex::Number(end)) =
                (parse_lenient(start), parse_lenient(end))
                && start <= end
                && end.abs_diff(start) < MAX_RANGE_LEN
            {
                indices.extend((start..=end).map(GalleryIndex::Number));
            }
        } else if !segment.is_empty() {
            indices.push(parse_lenient(segment));
        }
    }
    indices
}

/// Read a base-10 integer prefix: skip leading whitespace, accept one sign,
/// then take the digits up to the first non-digit.
fn parse_lenient(text: &str) -> GalleryIndex {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return GalleryIndex::NaN;
    }
    match rest[..digits_len].parse::<i64>() {
        Ok(n) if negative => GalleryIndex::Number(-n),
        Ok(n) => GalleryIndex::Number(n),
        Err(_) => GalleryIndex::NaN,
    }
}
