//! The five-letter word shared by guesses and answers.

use std::{fmt::Display, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::GuessError;

/// The number of letters in every guess and answer.
pub const WORD_LEN: usize = 5;

/// The number of letters in the alphabet words are drawn from.
pub(crate) const ALPHABET_LEN: usize = 26;

/// Maps an uppercase ASCII letter to its position in the alphabet.
pub(crate) fn letter_index(letter: u8) -> usize {
    (letter - b'A') as usize
}

/// A five-letter word, normalized to uppercase.
///
/// Every instance holds exactly [`WORD_LEN`] ASCII letters. Whether the word
/// is an accepted guess is a separate question answered by a
/// [`Dictionary`](crate::Dictionary).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "String", into = "String")
)]
pub struct Word {
    letters: [u8; WORD_LEN],
}

impl Word {
    /// Creates a new [`Word`] from raw text.
    ///
    /// Surrounding whitespace is ignored and letters are uppercased. Returns
    /// [`GuessError::WrongLength`] unless exactly five characters remain, and
    /// [`GuessError::NotInDictionary`] if any of them is not an ASCII letter,
    /// since no such word can be in a word list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_cl::{Word, GuessError};
    /// #
    /// let crane = Word::new(" crane\n")?;
    /// assert_eq!(crane.to_string(), "CRANE");
    ///
    /// assert_eq!(Word::new("cranes"), Err(GuessError::WrongLength(6)));
    /// assert!(Word::new("cr4ne").is_err());
    /// #
    /// # Ok::<_, wordle_cl::WordleError>(())
    /// ```
    pub fn new(raw: &str) -> Result<Self, GuessError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len != WORD_LEN {
            return Err(GuessError::WrongLength(len));
        }

        let mut letters = [0_u8; WORD_LEN];
        for (slot, c) in letters.iter_mut().zip(trimmed.chars()) {
            if !c.is_ascii_alphabetic() {
                return Err(GuessError::NotInDictionary(trimmed.to_uppercase()));
            }
            *slot = c.to_ascii_uppercase() as u8;
        }

        Ok(Word { letters })
    }

    /// Returns the uppercase ASCII bytes of the word.
    pub fn letters(&self) -> &[u8; WORD_LEN] {
        &self.letters
    }

    /// Iterates over the letters of the word as `char`s.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().map(|&b| b as char)
    }

    /// Returns true if `letter` (in either case) occurs anywhere in the word.
    pub fn contains(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        self.chars().any(|c| c == letter)
    }

    /// Counts how many times each letter of the alphabet occurs in the word.
    pub(crate) fn letter_counts(&self) -> [u8; ALPHABET_LEN] {
        let mut counts = [0_u8; ALPHABET_LEN];
        for &b in self.letters.iter() {
            counts[letter_index(b)] += 1;
        }
        counts
    }
}

impl FromStr for Word {
    type Err = GuessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::new(s)
    }
}

impl TryFrom<String> for Word {
    type Error = GuessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Word::new(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.chars() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
