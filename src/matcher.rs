use std::io::{self, Read};
use std::sync::Arc;

use crate::error::{DetectError, Result};
use crate::recognizer::{FormatRecognizer, TokenParser};
use crate::stream::{BufferedBytes, DataStream, MergedStream};
use crate::strength::MatchStrength;

/// Immutable outcome of one detection run.
///
/// Wraps the probe buffer, the window of valid bytes inside it, the retained
/// original stream (if detection consumed one) and the winning recognizer,
/// if any. Borrowing accessors may be called any number of times; the
/// stream-consuming accessors [`into_parser`](FormatMatch::into_parser) and
/// [`into_data_stream`](FormatMatch::into_data_stream) take the match by
/// value, so single use -- and never using both -- is enforced by ownership.
///
/// `R` is the retained stream type; it defaults to [`io::Empty`] for matches
/// produced from plain buffers.
pub struct FormatMatch<R = io::Empty> {
    /// Original stream, still open, positioned after the probed bytes
    stream: Option<R>,
    /// Probe buffer; only `[start, start + length)` holds valid input
    buffer: Vec<u8>,
    start: usize,
    length: usize,
    recognizer: Option<Arc<dyn FormatRecognizer>>,
    strength: MatchStrength,
}

impl<R> std::fmt::Debug for FormatMatch<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatMatch")
            .field("has_stream", &self.stream.is_some())
            .field("buffer_len", &self.buffer.len())
            .field("start", &self.start)
            .field("length", &self.length)
            .field("recognizer", &self.recognizer.as_deref().map(|r| r.name()))
            .field("strength", &self.strength)
            .finish()
    }
}

impl<R> FormatMatch<R> {
    /// Create a match over `buffer[start..start + length]` with an optional
    /// retained stream and winning recognizer.
    ///
    /// All bounds are validated before any field is committed; an illegal
    /// start/length combination fails with
    /// [`DetectError::IllegalStartLength`] and no partially constructed
    /// match escapes. Exposed so callers can wrap pre-read bytes themselves.
    pub fn new(
        stream: Option<R>,
        buffer: Vec<u8>,
        start: usize,
        length: usize,
        recognizer: Option<Arc<dyn FormatRecognizer>>,
        strength: MatchStrength,
    ) -> Result<Self> {
        let end = start.checked_add(length);
        match end {
            Some(end) if end <= buffer.len() => Ok(Self {
                stream,
                buffer,
                start,
                length,
                recognizer,
                strength,
            }),
            _ => Err(DetectError::IllegalStartLength {
                start,
                length,
                buffer_size: buffer.len(),
            }),
        }
    }

    /// True iff a recognizer won the detection run
    pub fn has_match(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Recorded strength; defined for matched and unmatched results alike
    pub fn match_strength(&self) -> MatchStrength {
        self.strength
    }

    /// Name of the winning recognizer's format, if any
    pub fn matched_format_name(&self) -> Option<&str> {
        self.recognizer.as_deref().map(|r| r.name())
    }

    /// The winning recognizer itself, for delegation
    pub fn matched_recognizer(&self) -> Option<&Arc<dyn FormatRecognizer>> {
        self.recognizer.as_ref()
    }

    /// Offset into the probe buffer where valid data begins
    pub fn buffered_start(&self) -> usize {
        self.start
    }

    /// Count of valid bytes from `buffered_start`
    pub fn buffered_length(&self) -> usize {
        self.length
    }
}

impl<R: Read + 'static> FormatMatch<R> {
    /// Build a parser by delegating to the winning recognizer.
    ///
    /// Returns `Ok(None)` when no recognizer won. Otherwise the recognizer
    /// receives the buffered window plus the retained stream as continuation
    /// source; an empty window with no stream still delegates, since a
    /// recognizer may legitimately parse empty input. Consumes the match.
    pub fn into_parser(self) -> Result<Option<Box<dyn TokenParser>>> {
        let recognizer = match self.recognizer {
            Some(r) => r,
            None => return Ok(None),
        };
        let tail = self.stream.map(|s| Box::new(s) as Box<dyn Read>);
        recognizer
            .create_parser(&self.buffer, self.start, self.length, tail)
            .map(Some)
    }
}

impl<R: Read> FormatMatch<R> {
    /// Reconstruct a single source spanning the buffered bytes followed by
    /// the retained stream's remaining bytes, with no loss or duplication.
    ///
    /// Yields [`DataStream::Merged`] when a stream was retained and
    /// [`DataStream::Buffered`] otherwise. Consumes the match: the returned
    /// source is the sole valid successor of the original input.
    pub fn into_data_stream(self) -> DataStream<R> {
        let end = self.start + self.length;
        match self.stream {
            Some(tail) => DataStream::Merged(MergedStream::new(self.buffer, self.start, end, tail)),
            None => DataStream::Buffered(BufferedBytes::new(self.buffer, self.start, end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonRecognizer;
    use crate::recognizer::Token;

    fn json() -> Arc<dyn FormatRecognizer> {
        Arc::new(JsonRecognizer::new())
    }

    #[test]
    fn test_construction_valid_bounds() {
        for (start, length, size) in [(0, 0, 0), (0, 2, 2), (2, 0, 2), (1, 1, 2), (0, 10, 10)] {
            let m: Result<FormatMatch> = FormatMatch::new(
                None,
                vec![0u8; size],
                start,
                length,
                None,
                MatchStrength::NoMatch,
            );
            assert!(m.is_ok(), "start={} length={} size={}", start, length, size);
        }
    }

    #[test]
    fn test_construction_illegal_start_length() {
        // start + length past the buffer, for empty and non-trivial buffers,
        // including combinations that overflow
        for (start, length, size) in [
            (2, 1, 2),
            (1, 0, 0),
            (0, 1, 0),
            (5, 6, 10),
            (usize::MAX, 1, 10),
            (usize::MAX, usize::MAX, 10),
        ] {
            let m: Result<FormatMatch> = FormatMatch::new(
                None,
                vec![0u8; size],
                start,
                length,
                Some(json()),
                MatchStrength::NoMatch,
            );
            match m {
                Err(DetectError::IllegalStartLength { .. }) => {}
                _ => panic!(
                    "expected IllegalStartLength for start={} length={} size={}",
                    start, length, size
                ),
            }
        }
    }

    #[test]
    fn test_matched_format_name() {
        let m: FormatMatch = FormatMatch::new(
            None,
            vec![0u8; 2],
            2,
            0,
            Some(json()),
            MatchStrength::SolidMatch,
        )
        .unwrap();
        assert!(m.has_match());
        assert_eq!(m.matched_format_name(), Some("JSON"));
        assert_eq!(m.match_strength(), MatchStrength::SolidMatch);
    }

    #[test]
    fn test_no_recognizer_no_parser() {
        let m: FormatMatch = FormatMatch::new(
            None,
            vec![0u8; 2],
            2,
            0,
            None,
            MatchStrength::Inconclusive,
        )
        .unwrap();
        assert!(!m.has_match());
        assert_eq!(m.matched_format_name(), None);
        assert!(m.into_parser().unwrap().is_none());
    }

    #[test]
    fn test_data_stream_without_original_stream() {
        let m: FormatMatch = FormatMatch::new(
            None,
            b"[1]".to_vec(),
            0,
            3,
            None,
            MatchStrength::WeakMatch,
        )
        .unwrap();
        let mut stream = m.into_data_stream();
        assert!(matches!(&stream, DataStream::Buffered(_)));
        assert_eq!(stream.available(), 3);
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"[1]");
        assert_eq!(stream.available(), 0);
    }

    #[test]
    fn test_data_stream_with_original_stream() {
        let tail: &[u8] = b", 2 ]";
        let m = FormatMatch::new(
            Some(tail),
            b"[ 1".to_vec(),
            0,
            3,
            None,
            MatchStrength::WeakMatch,
        )
        .unwrap();
        let mut stream = m.into_data_stream();
        assert!(matches!(&stream, DataStream::Merged(_)));
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"[ 1, 2 ]");
    }

    #[test]
    fn test_empty_window_with_stream_is_still_merged() {
        let tail: &[u8] = b"";
        let m = FormatMatch::new(
            Some(tail),
            vec![0u8; 2],
            0,
            0,
            None,
            MatchStrength::WeakMatch,
        )
        .unwrap();
        let stream = m.into_data_stream();
        assert!(matches!(&stream, DataStream::Merged(_)));
        assert_eq!(stream.available(), 0);
    }

    #[test]
    fn test_parser_over_buffer_and_tail() {
        // parser input must be prefix ++ tail, reassembled by the recognizer
        let tail: &[u8] = b"\"field\" : true }";
        let m = FormatMatch::new(
            Some(tail),
            b"{ ".to_vec(),
            0,
            2,
            Some(json()),
            MatchStrength::SolidMatch,
        )
        .unwrap();
        let mut parser = m.into_parser().unwrap().unwrap();
        assert_eq!(parser.next_token().unwrap(), Some(Token::StartObject));
        assert_eq!(
            parser.next_token().unwrap(),
            Some(Token::FieldName("field".to_string()))
        );
        assert_eq!(parser.next_token().unwrap(), Some(Token::BoolValue(true)));
        assert_eq!(parser.next_token().unwrap(), Some(Token::EndObject));
        assert_eq!(parser.next_token().unwrap(), None);
    }
}
