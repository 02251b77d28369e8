use thiserror::Error;

/// Input-domain failures raised at the public API boundary.
///
/// Sensor misses and checksum mismatches are not errors: they are reported
/// as `None` / `false` so the calling loop can simply keep going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TinySeedError {
    #[error("word value {0} is outside 1..=2048")]
    InvalidWordValue(u16),
    #[error("'{0}' is not in the BIP39 wordlist")]
    UnknownWord(String),
    #[error("unsupported word count {0} (expected 12 or 24)")]
    UnsupportedWordCount(usize),
    #[error("preset holds {got} words, expected {expected}")]
    InvalidPreset { expected: usize, got: usize },
}
