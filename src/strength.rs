/// Confidence level a recognizer assigns to a byte prefix.
///
/// The variants form a total order from weakest to strongest; all
/// arbitration in the detector is driven by plain comparisons.
/// `Inconclusive` means "not enough bytes or ambiguous signal" and is the
/// detector's fallback when nothing qualified -- a recognizer that is sure
/// the prefix is not its format reports `NoMatch` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchStrength {
    /// Explicit negative: the prefix definitely does not belong to the format
    NoMatch,
    /// Not enough input (or too ambiguous) to judge either way
    Inconclusive,
    /// Compatible with the format, but other formats could also produce it
    WeakMatch,
    /// Strong signal, misidentification unlikely
    SolidMatch,
    /// Unambiguous marker (magic bytes or equivalent) was seen
    FullMatch,
}

impl std::fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStrength::NoMatch => "no match",
            MatchStrength::Inconclusive => "inconclusive",
            MatchStrength::WeakMatch => "weak match",
            MatchStrength::SolidMatch => "solid match",
            MatchStrength::FullMatch => "full match",
        };
        write!(f, "{}", name)
    }
}
