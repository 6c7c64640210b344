//! Tracking which letters could still be in the answer.

use std::fmt::Display;

use itertools::Itertools;

use crate::word::{letter_index, Word, ALPHABET_LEN};

const FULL: u32 = (1 << ALPHABET_LEN) - 1;

/// The letters of the alphabet not yet proven absent from the answer.
///
/// The set starts with all 26 letters and only ever shrinks. A letter is
/// dropped once it has been guessed and the answer turned out not to contain
/// it anywhere; a letter that is in the answer stays even when it was guessed
/// in the wrong position. This is display information only and has no say in
/// whether a guess is accepted.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::{RemainingLetters, Word};
///
/// let mut remaining = RemainingLetters::new();
/// remaining.update(&Word::new("train")?, &Word::new("crane")?);
///
/// assert_eq!(remaining.len(), 24);
/// assert!(!remaining.contains('T'));
/// assert!(remaining.contains('N'));
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RemainingLetters {
    mask: u32,
}

impl Default for RemainingLetters {
    fn default() -> Self {
        RemainingLetters { mask: FULL }
    }
}

impl RemainingLetters {
    /// Creates a set holding the whole alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes each letter of `guess` that does not occur in `answer`.
    ///
    /// Removing a letter that is already gone does nothing.
    pub fn update(&mut self, guess: &Word, answer: &Word) {
        for &letter in guess.letters() {
            if !answer.letters().contains(&letter) {
                self.mask &= !(1 << letter_index(letter));
            }
        }
    }

    /// Returns true if `letter` (in either case) is still possible.
    pub fn contains(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        letter.is_ascii_uppercase() && self.mask & (1 << letter_index(letter as u8)) != 0
    }

    /// Gets the number of letters still possible.
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Returns true if every letter has been ruled out.
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Iterates over the remaining letters in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (b'A'..=b'Z')
            .filter(move |&b| self.mask & (1 << letter_index(b)) != 0)
            .map(|b| b as char)
    }
}

impl Display for RemainingLetters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(" "))
    }
}
