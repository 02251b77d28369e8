use bip39::Language;

use crate::core::error::TinySeedError;
use crate::core::grid::WordValue;

/// Size of every BIP39 wordlist.
pub const WORDLIST_LEN: usize = 2048;

/// Lookup between BIP39 words and zero-based wordlist indices.
pub trait Wordlist {
    fn index_of(&self, word: &str) -> Option<u16>;
    fn word_at(&self, index: u16) -> Option<&'static str>;

    /// Punched value of `word`.
    fn value_of(&self, word: &str) -> Result<WordValue, TinySeedError> {
        let index = self
            .index_of(word)
            .ok_or_else(|| TinySeedError::UnknownWord(word.to_string()))?;
        WordValue::from_index(index)
    }

    /// Word for a punched value.
    fn word_for(&self, value: WordValue) -> &'static str {
        self.word_at(value.index()).unwrap_or_default()
    }
}

impl Wordlist for Language {
    fn index_of(&self, word: &str) -> Option<u16> {
        self.find_word(&word.to_ascii_lowercase())
    }

    fn word_at(&self, index: u16) -> Option<&'static str> {
        self.word_list().get(index as usize).copied()
    }
}

/// Convert mnemonic words to punched values.
pub fn words_to_values<W, S>(wordlist: &W, words: &[S]) -> Result<Vec<WordValue>, TinySeedError>
where
    W: Wordlist + ?Sized,
    S: AsRef<str>,
{
    words
        .iter()
        .map(|word| wordlist.value_of(word.as_ref()))
        .collect()
}

/// Convert punched values back to mnemonic words.
pub fn values_to_words<W: Wordlist + ?Sized>(wordlist: &W, values: &[WordValue]) -> Vec<String> {
    values
        .iter()
        .map(|value| wordlist.word_for(*value).to_string())
        .collect()
}

/// Split a whitespace separated phrase into its words.
pub fn split_phrase(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_is_one_based_on_the_card() {
        let english = Language::English;
        assert_eq!(english.value_of("abandon").unwrap().get(), 1);
        assert_eq!(english.value_of("zoo").unwrap(), WordValue::EMPTY);
        assert_eq!(english.word_for(WordValue::EMPTY), "zoo");
    }

    #[test]
    fn unknown_words_are_rejected() {
        let err = words_to_values(&Language::English, &["abandon", "notaword"]).unwrap_err();
        assert_eq!(err, TinySeedError::UnknownWord("notaword".into()));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Language::English.index_of("Zoo"), Some(2047));
    }
}
