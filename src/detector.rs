use std::io::Read;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{DetectError, Result};
use crate::matcher::FormatMatch;
use crate::recognizer::FormatRecognizer;
use crate::strength::MatchStrength;

/// Default number of bytes read speculatively before committing to a verdict
pub const DEFAULT_MAX_INPUT_LOOKAHEAD: usize = 64;

/// Runs the probing protocol over an input and produces a [`FormatMatch`].
///
/// Holds an ordered collection of recognizers plus detection policy. Order
/// matters only for iteration and short-circuiting: the first recognizer to
/// reach the optimal threshold wins immediately, even if a later one would
/// have matched more strongly. The detector is immutable; every
/// reconfiguration returns a new value (or an equal one when nothing
/// changed) and shares the recognizer list, so clones are cheap and
/// instances can be used from multiple threads.
#[derive(Clone)]
pub struct FormatDetector {
    recognizers: Arc<Vec<Arc<dyn FormatRecognizer>>>,
    optimal_match: MatchStrength,
    minimal_match: MatchStrength,
    max_input_lookahead: usize,
}

impl FormatDetector {
    /// Create a detector over the given recognizers with default policy:
    /// optimal threshold `SolidMatch`, minimal threshold `WeakMatch`,
    /// lookahead [`DEFAULT_MAX_INPUT_LOOKAHEAD`] bytes.
    pub fn new(recognizers: Vec<Arc<dyn FormatRecognizer>>) -> Self {
        Self {
            recognizers: Arc::new(recognizers),
            optimal_match: MatchStrength::SolidMatch,
            minimal_match: MatchStrength::WeakMatch,
            max_input_lookahead: DEFAULT_MAX_INPUT_LOOKAHEAD,
        }
    }

    /// Threshold at which iteration stops and the recognizer wins outright
    pub fn optimal_match(&self) -> MatchStrength {
        self.optimal_match
    }

    /// Weakest strength still accepted as a match
    pub fn minimal_match(&self) -> MatchStrength {
        self.minimal_match
    }

    /// Probe window cap in bytes
    pub fn max_input_lookahead(&self) -> usize {
        self.max_input_lookahead
    }

    /// Copy-on-change: returns an equal detector (sharing the recognizer
    /// list) when the value is unchanged, a reconfigured one otherwise.
    pub fn with_optimal_match(&self, optimal_match: MatchStrength) -> Self {
        if optimal_match == self.optimal_match {
            return self.clone();
        }
        Self {
            optimal_match,
            ..self.clone()
        }
    }

    /// Copy-on-change counterpart of [`with_optimal_match`](Self::with_optimal_match)
    /// for the minimal threshold.
    pub fn with_minimal_match(&self, minimal_match: MatchStrength) -> Self {
        if minimal_match == self.minimal_match {
            return self.clone();
        }
        Self {
            minimal_match,
            ..self.clone()
        }
    }

    /// Copy-on-change counterpart for the lookahead cap.
    pub fn with_max_input_lookahead(&self, max_input_lookahead: usize) -> Self {
        if max_input_lookahead == self.max_input_lookahead {
            return self.clone();
        }
        Self {
            max_input_lookahead,
            ..self.clone()
        }
    }

    /// Detect the format of a byte slice.
    ///
    /// The probe window is the first `max_input_lookahead` bytes of the
    /// slice; the whole slice is retained as the match buffer so the
    /// reconstructed data stream loses nothing. No I/O is performed.
    pub fn find_format(&self, data: &[u8]) -> Result<FormatMatch> {
        self.find_format_in(data, 0, data.len())
    }

    /// Detect the format of `data[offset..offset + length]`.
    pub fn find_format_in(&self, data: &[u8], offset: usize, length: usize) -> Result<FormatMatch> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or(DetectError::IllegalStartLength {
                start: offset,
                length,
                buffer_size: data.len(),
            })?;

        let region = &data[offset..end];
        let window = &region[..length.min(self.max_input_lookahead)];
        let (recognizer, strength) = self.select(window);
        FormatMatch::new(None, region.to_vec(), 0, length, recognizer, strength)
    }

    /// Detect the format of an open stream.
    ///
    /// Reads up to `max_input_lookahead` bytes into a fresh buffer, retrying
    /// short reads until the cap or end-of-input. The stream is retained
    /// open inside the returned match; together with the probe buffer it
    /// still represents the complete original input. An I/O failure aborts
    /// detection and no partial match is returned.
    pub fn find_format_from<R: Read>(&self, mut reader: R) -> Result<FormatMatch<R>> {
        if self.recognizers.is_empty() {
            // nothing to probe for; hand the untouched stream back
            debug!("no recognizers configured, skipping probe");
            return FormatMatch::new(
                Some(reader),
                Vec::new(),
                0,
                0,
                None,
                MatchStrength::Inconclusive,
            );
        }

        let mut buf = vec![0u8; self.max_input_lookahead];
        let mut filled = 0;
        while filled < buf.len() {
            let n = reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);

        let (recognizer, strength) = self.select(&buf);
        FormatMatch::new(Some(reader), buf, 0, filled, recognizer, strength)
    }

    /// Arbitrate the recognizers over one probe window.
    fn select(&self, window: &[u8]) -> (Option<Arc<dyn FormatRecognizer>>, MatchStrength) {
        let mut best: Option<(&Arc<dyn FormatRecognizer>, MatchStrength)> = None;
        for recognizer in self.recognizers.iter() {
            let strength = recognizer.match_strength(window);
            trace!(format = recognizer.name(), %strength, "recognizer verdict");
            if strength >= self.optimal_match {
                // first recognizer at the optimal threshold wins outright;
                // later, possibly slower, recognizers are skipped
                debug!(format = recognizer.name(), %strength, "optimal match");
                return (Some(Arc::clone(recognizer)), strength);
            }
            if best.map_or(true, |(_, b)| strength > b) {
                best = Some((recognizer, strength));
            }
        }
        match best {
            Some((recognizer, strength)) if strength >= self.minimal_match => {
                debug!(format = recognizer.name(), %strength, "best match above minimal threshold");
                (Some(Arc::clone(recognizer)), strength)
            }
            _ => {
                // nothing qualified; the input may still belong to a format
                // outside the configured set, so no hard negative here
                debug!("no recognizer qualified");
                (None, MatchStrength::Inconclusive)
            }
        }
    }
}

impl PartialEq for FormatDetector {
    /// Equality is recognizer-list identity plus policy; good enough to
    /// state the copy-on-change laws without comparing trait objects.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.recognizers, &other.recognizers)
            && self.optimal_match == other.optimal_match
            && self.minimal_match == other.minimal_match
            && self.max_input_lookahead == other.max_input_lookahead
    }
}

impl std::fmt::Display for FormatDetector {
    /// Renders the configured format names in order: `[JSON, JSON, JSON]`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, recognizer) in self.recognizers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", recognizer.name())?;
        }
        write!(f, "]")
    }
}

impl std::fmt::Debug for FormatDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatDetector")
            .field("recognizers", &format_args!("{}", self))
            .field("optimal_match", &self.optimal_match)
            .field("minimal_match", &self.minimal_match)
            .field("max_input_lookahead", &self.max_input_lookahead)
            .finish()
    }
}
