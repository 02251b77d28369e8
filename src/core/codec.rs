//! BIP39 checksum arithmetic applied directly to punched word values.
//!
//! A mnemonic of `N` words is `11 * N` bits: entropy followed by
//! `11 * N / 33` checksum bits, which land in the low bits of the last word.
//! The card lets the user punch those bits freely, so before a sequence is
//! accepted they are recomputed from the entropy and overwritten.

use sha2::{Digest, Sha256};

use crate::core::grid::WordValue;

const BITS_PER_WORD: usize = 11;

/// Number of checksum bits carried by a sequence of `word_count` words.
pub fn checksum_bits(word_count: usize) -> usize {
    word_count * BITS_PER_WORD / 33
}

/// Concatenate the zero-based indices, MSB first, into a big-endian
/// bitstream padded with zero bits to a whole byte.
pub fn pack(words: &[WordValue]) -> Vec<u8> {
    let total_bits = words.len() * BITS_PER_WORD;
    let mut out = vec![0u8; total_bits.div_ceil(8)];
    for (w, word) in words.iter().enumerate() {
        let index = word.index();
        for bit in 0..BITS_PER_WORD {
            if (index >> (BITS_PER_WORD - 1 - bit)) & 1 == 1 {
                let pos = w * BITS_PER_WORD + bit;
                out[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    out
}

/// Checksum implied by the entropy part of `words`.
///
/// The reserved low bits of the last word are ignored, whatever they hold.
pub fn compute_checksum(words: &[WordValue]) -> u16 {
    let cs_bits = checksum_bits(words.len());
    if cs_bits == 0 {
        return 0;
    }
    let entropy_bits = words.len() * BITS_PER_WORD - cs_bits;
    let stream = pack(words);
    let digest = Sha256::digest(&stream[..entropy_bits / 8]);
    let head = u16::from_be_bytes([digest[0], digest[1]]);
    head >> (16 - cs_bits)
}

/// Whether the reserved bits of the last word already hold the checksum.
pub fn has_valid_checksum(words: &[WordValue]) -> bool {
    let Some(last) = words.last() else {
        return false;
    };
    let mask = checksum_mask(words.len());
    last.index() & mask == compute_checksum(words)
}

/// Overwrite the reserved bits of the last word with the computed checksum.
pub fn inject_checksum_in_place(words: &mut [WordValue]) {
    let checksum = compute_checksum(words);
    let mask = checksum_mask(words.len());
    if let Some(last) = words.last_mut() {
        let index = (last.index() & !mask) | checksum;
        *last = WordValue::from_index_bits(index);
        log::trace!("injected checksum {checksum:#x}, last word now {last}");
    }
}

/// Copying variant of [`inject_checksum_in_place`].
#[must_use]
pub fn inject_checksum(words: &[WordValue]) -> Vec<WordValue> {
    let mut out = words.to_vec();
    inject_checksum_in_place(&mut out);
    out
}

fn checksum_mask(word_count: usize) -> u16 {
    ((1u32 << checksum_bits(word_count)) - 1) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(values: &[u16]) -> Vec<WordValue> {
        values.iter().map(|v| WordValue::new(*v).unwrap()).collect()
    }

    fn repeated(value: u16, count: usize, last: u16) -> Vec<WordValue> {
        let mut values = vec![value; count - 1];
        values.push(last);
        seed(&values)
    }

    #[test]
    fn checksum_width_matches_bip39() {
        assert_eq!(checksum_bits(12), 4);
        assert_eq!(checksum_bits(24), 8);
        assert_eq!(checksum_bits(15), 5);
    }

    #[test]
    fn pack_is_msb_first() {
        // index 1024 -> 100_0000_0000, index 1 -> 000_0000_0001
        let stream = pack(&seed(&[1025, 2]));
        assert_eq!(stream, vec![0b1000_0000, 0b0000_0000, 0b0000_0100]);
    }

    #[test]
    fn known_twelve_word_vectors() {
        // abandon x11 about
        let zero = inject_checksum(&repeated(1, 12, 1));
        assert_eq!(zero[11].index(), 3);
        // zoo x11 wrong
        let ones = inject_checksum(&repeated(2048, 12, 2048));
        assert_eq!(ones[11].index(), 2037);
    }

    #[test]
    fn known_twenty_four_word_vectors() {
        // abandon x23 art
        let zero = inject_checksum(&repeated(1, 24, 1));
        assert_eq!(zero[23].index(), 102);
        // zoo x23 vote
        let ones = inject_checksum(&repeated(2048, 24, 2048));
        assert_eq!(ones[23].index(), 1967);
    }

    #[test]
    fn reserved_bits_do_not_affect_checksum() {
        let a = repeated(2048, 12, 433);
        let b = repeated(2048, 12, 433 + 7);
        assert_eq!(compute_checksum(&a), compute_checksum(&b));
    }

    #[test]
    fn injection_is_idempotent_and_validates() {
        let words = seed(&[5, 900, 17, 2048, 1, 1999, 64, 300, 1200, 77, 450, 1300]);
        let once = inject_checksum(&words);
        assert_eq!(inject_checksum(&once), once);
        assert!(has_valid_checksum(&once));
        assert_eq!(&once[..11], &words[..11]);
        assert_eq!(once[11].index() & !0xf, words[11].index() & !0xf);
    }

    #[test]
    fn default_preset_gets_its_checksum() {
        let words = inject_checksum(&repeated(2048, 12, 433));
        assert_eq!(words[11].get(), 445);
        assert!(!has_valid_checksum(&repeated(2048, 12, 433)));
    }
}
