use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::TinySeedError;

/// Words on one Tiny Seed page (one card face).
pub const WORDS_PER_PAGE: usize = 12;
/// Punch columns per word: column 0 weighs 2048, columns 1..=11 weigh 1024..=1.
pub const COLUMNS: usize = 12;

/// One-based index into the 2048-entry BIP39 wordlist, as punched on the card.
///
/// The card stores the one-based value, so the all-zero pattern never
/// occurs and the "empty" word is 2048 (only column 0 punched).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct WordValue(u16);

impl WordValue {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 2048;
    /// Default value of an untouched row.
    pub const EMPTY: WordValue = WordValue(2048);

    pub fn new(value: u16) -> Result<Self, TinySeedError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TinySeedError::InvalidWordValue(value))
        }
    }

    /// Build from a zero-based wordlist index.
    pub fn from_index(index: u16) -> Result<Self, TinySeedError> {
        Self::new(index.saturating_add(1))
    }

    /// Build from the low 11 bits of a zero-based index; never out of range.
    pub fn from_index_bits(index: u16) -> Self {
        Self((index & 0x7ff) + 1)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Zero-based wordlist index.
    pub fn index(self) -> u16 {
        self.0 - 1
    }

    /// Whether the hole at `column` (0 = leftmost, weight 2048) is punched.
    pub fn is_punched(self, column: usize) -> bool {
        column < COLUMNS && (self.0 >> (COLUMNS - 1 - column)) & 1 == 1
    }

    /// Flip the hole at `column`.
    ///
    /// Column 0 does not toggle: it restores the default value 2048, since
    /// any other pattern with the 2048 hole punched is out of range. Flips
    /// that would leave no hole punched also land on 2048.
    #[must_use]
    pub fn toggle(self, column: usize) -> Self {
        match column {
            0 => Self::EMPTY,
            c if c < COLUMNS => {
                let flipped = (self.0 ^ (1 << (COLUMNS - 1 - c))) % Self::MAX;
                if flipped == 0 {
                    Self::EMPTY
                } else {
                    Self(flipped)
                }
            }
            _ => self,
        }
    }
}

impl Default for WordValue {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl TryFrom<u16> for WordValue {
    type Error = TinySeedError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WordValue> for u16 {
    fn from(value: WordValue) -> u16 {
        value.0
    }
}

impl fmt::Display for WordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported mnemonic lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedLength {
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "24")]
    TwentyFour,
}

impl SeedLength {
    pub fn from_word_count(count: usize) -> Result<Self, TinySeedError> {
        match count {
            12 => Ok(Self::Twelve),
            24 => Ok(Self::TwentyFour),
            other => Err(TinySeedError::UnsupportedWordCount(other)),
        }
    }

    pub fn word_count(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::TwentyFour => 24,
        }
    }

    pub fn pages(self) -> usize {
        self.word_count() / WORDS_PER_PAGE
    }

    /// Whether `page` holds the word that carries the checksum.
    pub fn has_checksum_on(self, page: usize) -> bool {
        page + 1 == self.pages()
    }
}

/// One page of a seed: twelve words, one card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PunchGrid {
    words: [WordValue; WORDS_PER_PAGE],
}

impl PunchGrid {
    pub fn new() -> Self {
        Self {
            words: [WordValue::EMPTY; WORDS_PER_PAGE],
        }
    }

    pub fn from_words(words: [WordValue; WORDS_PER_PAGE]) -> Self {
        Self { words }
    }

    /// Build from plain values, validating each one.
    pub fn from_values(values: &[u16]) -> Result<Self, TinySeedError> {
        if values.len() != WORDS_PER_PAGE {
            return Err(TinySeedError::InvalidPreset {
                expected: WORDS_PER_PAGE,
                got: values.len(),
            });
        }
        let mut words = [WordValue::EMPTY; WORDS_PER_PAGE];
        for (slot, value) in words.iter_mut().zip(values) {
            *slot = WordValue::new(*value)?;
        }
        Ok(Self { words })
    }

    /// Accept a raw sensor reading only if every row is a valid word value.
    pub fn from_reading(raw: [u16; WORDS_PER_PAGE]) -> Option<Self> {
        Self::from_values(&raw).ok()
    }

    pub fn word(&self, row: usize) -> WordValue {
        self.words[row]
    }

    pub fn set_word(&mut self, row: usize, value: WordValue) {
        self.words[row] = value;
    }

    pub fn toggle(&mut self, row: usize, column: usize) {
        self.words[row] = self.words[row].toggle(column);
    }

    pub fn reset(&mut self, row: usize) {
        self.words[row] = WordValue::EMPTY;
    }

    pub fn words(&self) -> &[WordValue; WORDS_PER_PAGE] {
        &self.words
    }

    pub fn values(&self) -> [u16; WORDS_PER_PAGE] {
        self.words.map(WordValue::get)
    }

    pub fn is_punched(&self, row: usize, column: usize) -> bool {
        self.words[row].is_punched(column)
    }
}

impl Default for PunchGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a full seed into card pages.
pub fn paginate(words: &[WordValue]) -> Vec<PunchGrid> {
    words
        .chunks(WORDS_PER_PAGE)
        .filter(|chunk| chunk.len() == WORDS_PER_PAGE)
        .map(|chunk| {
            let mut grid = PunchGrid::new();
            for (row, word) in chunk.iter().enumerate() {
                grid.set_word(row, *word);
            }
            grid
        })
        .collect()
}

/// Join card pages back into one seed.
pub fn flatten(pages: &[PunchGrid]) -> Vec<WordValue> {
    pages.iter().flat_map(|page| page.words).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_the_word() {
        for value in [1u16, 2, 433, 1024, 1500, 2047, 2048] {
            let word = WordValue::new(value).unwrap();
            for column in 1..COLUMNS {
                assert_eq!(word.toggle(column).toggle(column), word, "{value} col {column}");
            }
        }
    }

    #[test]
    fn column_zero_always_resets() {
        for value in [1u16, 433, 2047, 2048] {
            let word = WordValue::new(value).unwrap();
            assert_eq!(word.toggle(0), WordValue::EMPTY);
        }
    }

    #[test]
    fn clearing_the_last_hole_collapses_to_empty() {
        let word = WordValue::new(1024).unwrap();
        assert_eq!(word.toggle(1), WordValue::EMPTY);
        assert_eq!(WordValue::EMPTY.toggle(11).get(), 1);
    }

    #[test]
    fn reset_clears_the_whole_word() {
        let mut grid = PunchGrid::new();
        grid.set_word(4, WordValue::new(1500).unwrap());
        grid.toggle(7, 11);
        grid.reset(4);
        assert_eq!(grid.word(4), WordValue::EMPTY);
        assert_eq!(grid.word(7).get(), 1);
        assert!((1..COLUMNS).all(|c| !grid.is_punched(4, c)));
    }

    #[test]
    fn punched_columns_follow_weights() {
        let word = WordValue::new(2048).unwrap();
        assert!(word.is_punched(0));
        assert!((1..COLUMNS).all(|c| !word.is_punched(c)));
        let word = WordValue::new(433).unwrap();
        // 433 = 256 + 128 + 32 + 16 + 1
        let punched: Vec<usize> = (0..COLUMNS).filter(|c| word.is_punched(*c)).collect();
        assert_eq!(punched, vec![3, 4, 6, 7, 11]);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(WordValue::new(0), Err(TinySeedError::InvalidWordValue(0)));
        assert!(WordValue::new(2049).is_err());
        assert!(PunchGrid::from_reading([0; WORDS_PER_PAGE]).is_none());
        assert!(PunchGrid::from_reading([4095; WORDS_PER_PAGE]).is_none());
    }

    #[test]
    fn paginate_and_flatten_are_inverse() {
        let words: Vec<WordValue> = (1..=24).map(|v| WordValue::new(v * 50).unwrap()).collect();
        let pages = paginate(&words);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].word(0).get(), 13 * 50);
        assert_eq!(flatten(&pages), words);
    }
}
