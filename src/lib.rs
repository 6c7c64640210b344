#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod word;
pub use word::{Word, WORD_LEN};

pub mod words;
pub use words::{load_words, Dictionary, WordList};

pub mod puzzle;
pub use puzzle::{score, ScoredGuess, Verdict};

pub mod letters;
pub use letters::RemainingLetters;

pub mod round;
pub use round::{Difficulty, RoundOutcome, RoundReport, RoundState};

pub mod stats;
pub use stats::{record_round, StatsSink};

#[cfg(feature = "fancy")]
pub mod render;

/// A result whose error defaults to [`WordleError`].
pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_cl` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("guess was rejected")]
    Guess {
        #[from]
        kind: GuessError,
    },

    #[error("general IO error")]
    Io(#[from] std::io::Error),

    /// A round was configured with a budget of zero guesses.
    #[error("a round needs a guess budget of at least one, got {0}")]
    InvalidBudget(usize),

    /// There is nothing to pick an answer from.
    #[error("the answer list is empty")]
    EmptyAnswerPool,

    /// A word list contained something other than five-letter words.
    #[error("line {line}: \"{word}\" is not a five-letter word")]
    InvalidWord { line: usize, word: String },

    #[error("the statistics store encountered an error")]
    Stats {
        #[from]
        kind: StatsError,
    },
}

/// Reasons a guess can be turned away by [`RoundState::submit_guess()`].
///
/// None of these cost the player a turn. The caller should report the problem
/// and ask again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    /// The guess does not have exactly five letters. Holds the length seen.
    #[error("a guess must be exactly 5 letters, got {0}")]
    WrongLength(usize),

    /// The guess is five characters long but is not an accepted word.
    #[error("the word \"{0}\" is not in the word list")]
    NotInDictionary(String),

    /// The round has already been won or lost.
    #[error("the round is already over")]
    RoundOver,
}

#[derive(Debug, Error)]
pub enum StatsError {
    /// The player is already registered with the store. Callers should treat
    /// this as informational.
    #[error("player \"{0}\" already exists")]
    PlayerExists(String),

    #[error("could not read or write statistics")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("trouble serializing or deserializing statistics")]
    Serde(#[from] serde_json::Error),
}
