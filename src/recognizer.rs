use std::io::Read;

use crate::error::Result;
use crate::strength::MatchStrength;

/// A single structured-content event produced by a format parser.
///
/// All format backends emit the same vocabulary, so callers can consume a
/// parser without knowing which format won detection.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// Field name inside an object
    FieldName(String),
    StringValue(String),
    IntValue(i64),
    FloatValue(f64),
    BoolValue(bool),
    NullValue,
}

/// Pull parser over one document of a detected format.
///
/// `next_token` yields events in document order and `None` at end-of-input.
pub trait TokenParser {
    fn next_token(&mut self) -> Result<Option<Token>>;
}

/// Pluggable capability that judges whether a byte prefix belongs to its
/// format and can build a parser for it.
///
/// Recognizers are supplied by the caller, outlive any single detection run
/// and are never mutated by the detector. New formats are added by supplying
/// a new implementation, never by branching inside the detector.
pub trait FormatRecognizer: Send + Sync {
    /// Stable format name, e.g. `"JSON"`
    fn name(&self) -> &str;

    /// Judge the given probe window.
    ///
    /// The window may be shorter than the document; a recognizer that runs
    /// out of bytes before reaching a verdict reports
    /// [`MatchStrength::Inconclusive`], and reserves
    /// [`MatchStrength::NoMatch`] for a deliberate negative.
    fn match_strength(&self, window: &[u8]) -> MatchStrength;

    /// Build a format-specific parser over `buf[start..start + length]`
    /// followed by the optional continuation stream.
    ///
    /// The recognizer decides whether the parser reads the raw bytes only or
    /// merges the buffer with the tail; callers obtain both from a
    /// [`FormatMatch`](crate::FormatMatch) and never slice by hand.
    fn create_parser(
        &self,
        buf: &[u8],
        start: usize,
        length: usize,
        tail: Option<Box<dyn Read>>,
    ) -> Result<Box<dyn TokenParser>>;
}
