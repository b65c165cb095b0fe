//! Plain text decoding and line-break cleanup.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{DocError, Result};

/// Encodings tried, in order, when decoding a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

impl TextEncoding {
    /// Latin-1 accepts every byte sequence, so `extract` never falls through
    /// to Windows-1252 or fails with `DecodeError` when using this order.
    pub const FALLBACK_ORDER: [TextEncoding; 3] =
        [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Windows1252];

    /// Decode `bytes`, or `None` when they are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            // Every byte maps to the code point of the same value.
            Self::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Self::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
        }
    }
}

/// Windows-1252 differs from Latin-1 only in 0x80..=0x9F, where five bytes
/// are unassigned.
fn windows_1252_char(byte: u8) -> Option<char> {
    let c = match byte {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8e => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        0x81 | 0x8d | 0x8f | 0x90 | 0x9d => return None,
        other => other as char,
    };
    Some(c)
}

static EXCESS_NEWLINES: OnceLock<Regex> = OnceLock::new();

fn excess_newlines() -> &'static Regex {
    EXCESS_NEWLINES.get_or_init(|| Regex::new(r"\n{3,}").expect("newline pattern should compile"))
}

/// Decode a plain text file and clean up its line breaks.
pub fn extract(content: &[u8]) -> Result<String> {
    let (encoding, text) = TextEncoding::FALLBACK_ORDER
        .iter()
        .find_map(|encoding| encoding.decode(content).map(|text| (*encoding, text)))
        .ok_or(DocError::DecodeError)?;

    log::debug!("Decoded text file as {:?}", encoding);

    Ok(normalize_line_breaks(&text))
}

/// Convert CRLF to LF and collapse runs of three or more newlines to two.
pub fn normalize_line_breaks(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    excess_newlines().replace_all(&text, "\n\n").into_owned()
}
