//! Pole identifier normalization.
//!
//! The two exports label the same physical pole differently: structural
//! ids carry a positional prefix ("1-PL12345") while survey pole numbers
//! are usually bare ("PL12345"). Both are reduced to one comparable key.
//! This is a best-effort heuristic, not a bijection; a failed match
//! degrades to an empty survey counterpart, never an error.

/// Sentinel for ids that could not be parsed at all.
pub const UNKNOWN_POLE: &str = "UNKNOWN_POLE";

/// Which export an identifier came from, for source-specific rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoleSource {
    Structural,
    Survey,
}

/// Canonicalizes a raw pole id. Whitespace is trimmed; structural ids
/// with a hyphen lose everything up to and including the first hyphen
/// (later hyphens are kept). Empty input yields [`UNKNOWN_POLE`].
pub fn canonical_pole_id(raw: &str, source: PoleSource) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNKNOWN_POLE.to_string();
    }
    if source == PoleSource::Structural {
        if let Some((_, rest)) = trimmed.split_once('-') {
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    trimmed.to_string()
}
