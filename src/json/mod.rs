//! Built-in JSON recognizer and token parser.

pub mod parser;

use std::io::Read;

use crate::error::Result;
use crate::recognizer::{FormatRecognizer, TokenParser};
use crate::stream::MergedStream;
use crate::strength::MatchStrength;

pub use parser::JsonTokenParser;

/// UTF-8 byte order mark, skipped before judging the prefix
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Recognizer for JSON content.
///
/// Judges the probe window by its first meaningful bytes: an object opener
/// followed by a field name or immediate close is a solid signal, an array
/// opener likewise; bare scalars (string, number, `true`/`false`/`null`)
/// are valid JSON documents but too common in other text formats for more
/// than a weak claim. JSON has no magic bytes, so `FullMatch` is never
/// reported.
#[derive(Debug, Default)]
pub struct JsonRecognizer;

impl JsonRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl FormatRecognizer for JsonRecognizer {
    fn name(&self) -> &str {
        "JSON"
    }

    fn match_strength(&self, window: &[u8]) -> MatchStrength {
        let mut bytes = window;
        if bytes.starts_with(&UTF8_BOM) {
            bytes = &bytes[UTF8_BOM.len()..];
        }

        let (first, rest) = match next_meaningful(bytes) {
            Some(found) => found,
            None => return MatchStrength::Inconclusive,
        };

        match first {
            b'{' => match next_meaningful(rest) {
                // a field name or an immediately closed object
                Some((b'"', _)) | Some((b'}', _)) => MatchStrength::SolidMatch,
                Some(_) => MatchStrength::NoMatch,
                None => MatchStrength::Inconclusive,
            },
            // arrays are shared with other bracket-delimited formats, but
            // still the strongest claim JSON can make without magic bytes
            b'[' => MatchStrength::SolidMatch,
            b'"' => MatchStrength::WeakMatch,
            b'0'..=b'9' => MatchStrength::WeakMatch,
            b'-' => match rest.first() {
                Some(b'0'..=b'9') => MatchStrength::WeakMatch,
                Some(_) => MatchStrength::NoMatch,
                None => MatchStrength::Inconclusive,
            },
            b'n' => match_keyword(rest, b"ull"),
            b't' => match_keyword(rest, b"rue"),
            b'f' => match_keyword(rest, b"alse"),
            _ => MatchStrength::NoMatch,
        }
    }

    fn create_parser(
        &self,
        buf: &[u8],
        start: usize,
        length: usize,
        tail: Option<Box<dyn Read>>,
    ) -> Result<Box<dyn TokenParser>> {
        let window = buf[start..start + length].to_vec();
        let parser = match tail {
            // buffered window first, then the rest of the original stream
            Some(tail) => {
                let end = window.len();
                JsonTokenParser::from_reader(MergedStream::new(window, 0, end, tail))?
            }
            None => JsonTokenParser::from_slice(&window)?,
        };
        Ok(Box::new(parser))
    }
}

/// First byte that is not JSON whitespace, plus the bytes after it
fn next_meaningful(bytes: &[u8]) -> Option<(u8, &[u8])> {
    for (i, &b) in bytes.iter().enumerate() {
        if !matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
            return Some((b, &bytes[i + 1..]));
        }
    }
    None
}

/// Match the remainder of a JSON keyword whose first byte was already seen.
///
/// A truncated keyword is inconclusive (the window may simply have been cut
/// short); a diverging byte is a hard negative.
fn match_keyword(bytes: &[u8], rest_of_word: &[u8]) -> MatchStrength {
    for (i, &expected) in rest_of_word.iter().enumerate() {
        match bytes.get(i) {
            Some(&b) if b == expected => continue,
            Some(_) => return MatchStrength::NoMatch,
            None => return MatchStrength::Inconclusive,
        }
    }
    MatchStrength::WeakMatch
}
