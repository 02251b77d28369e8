//! Core domain primitives: word values, card pages, checksum arithmetic
//! and the BIP39 wordlist seam.

pub mod ascii;
pub mod codec;
pub mod error;
pub mod grid;
pub mod wordlist;

pub use ascii::{Marker, RenderStyle, render_page};
pub use codec::{checksum_bits, compute_checksum, has_valid_checksum, inject_checksum, pack};
pub use error::TinySeedError;
pub use grid::{COLUMNS, PunchGrid, SeedLength, WORDS_PER_PAGE, WordValue, flatten, paginate};
pub use wordlist::{Wordlist, values_to_words, words_to_values};
