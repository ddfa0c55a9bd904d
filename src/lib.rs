//! Content-type detection for structured text and binary formats
//!
//! This library probes the leading bytes of an input of unknown format
//! against a set of pluggable recognizers and hands back both a verdict and
//! a byte source that lost nothing to the probing:
//! - Ordered confidence arbitration with configurable thresholds and
//!   short-circuiting
//! - Bounded lookahead over byte slices or read-once streams
//! - Loss-free stream reconstruction (buffered prefix merged with the
//!   unread remainder of the original source)
//! - A built-in JSON recognizer; new formats plug in via the
//!   `FormatRecognizer` trait

pub mod detector;
pub mod error;
pub mod json;
pub mod matcher;
pub mod recognizer;
pub mod stream;
pub mod strength;

// Re-export commonly used types
pub use detector::{FormatDetector, DEFAULT_MAX_INPUT_LOOKAHEAD};
pub use error::{DetectError, Result};
pub use json::{JsonRecognizer, JsonTokenParser};
pub use matcher::FormatMatch;
pub use recognizer::{FormatRecognizer, Token, TokenParser};
pub use stream::{BufferedBytes, DataStream, MergedStream};
pub use strength::MatchStrength;
