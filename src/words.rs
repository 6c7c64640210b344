//! Word lists and the dictionary capability rounds are validated against.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::{word::Word, Result, WordleError};

/// The answer pool compiled into the crate.
pub const ANSWERS: &str = include_str!("../data/answers.txt");

/// Extra accepted guesses compiled into the crate, beyond [`ANSWERS`].
pub const GUESSES: &str = include_str!("../data/allowed.txt");

/// Something that can say whether a word is an accepted guess.
///
/// [`RoundState`](crate::RoundState) takes one of these when it is created
/// instead of reading a global word list. Any `Fn(&Word) -> bool` works,
/// which keeps tests short.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::{Dictionary, Word};
///
/// let only_crane = |word: &Word| word.to_string() == "CRANE";
/// assert!(only_crane.is_valid_guess(&Word::new("crane")?));
/// assert!(!only_crane.is_valid_guess(&Word::new("train")?));
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
pub trait Dictionary {
    /// Returns true if `word` may be submitted as a guess.
    fn is_valid_guess(&self, word: &Word) -> bool;
}

impl<F> Dictionary for F
where
    F: Fn(&Word) -> bool,
{
    fn is_valid_guess(&self, word: &Word) -> bool {
        self(word)
    }
}

/// Reads whitespace-separated five-letter words.
///
/// Words may be in either case and may share lines. Blank input yields an
/// empty list. The first token that is not a five-letter word fails the
/// whole load with [`WordleError::InvalidWord`], naming its line.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::load_words;
///
/// let words = load_words("crane train\n\nspeed\n".as_bytes())?;
/// assert_eq!(words.len(), 3);
/// assert_eq!(words[2].to_string(), "SPEED");
///
/// assert!(load_words("crane\ncranes\n".as_bytes()).is_err());
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
pub fn load_words(reader: impl BufRead) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let word = Word::new(token).map_err(|_| WordleError::InvalidWord {
                line: i + 1,
                word: token.to_string(),
            })?;
            words.push(word);
        }
    }
    Ok(words)
}

/// An immutable pool of answers and the set of words accepted as guesses.
///
/// Every answer is also an accepted guess, whether or not it appears in the
/// guess list the [`WordList`] was built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordList {
    answers: Vec<Word>,
    guesses: BTreeSet<Word>,
}

impl WordList {
    /// Creates a new [`WordList`] from an answer pool and extra guesses.
    pub fn new(answers: Vec<Word>, guesses: impl IntoIterator<Item = Word>) -> Self {
        let mut guesses: BTreeSet<Word> = guesses.into_iter().collect();
        guesses.extend(answers.iter().copied());
        WordList { answers, guesses }
    }

    /// Creates the word list compiled into the crate.
    pub fn builtin() -> Self {
        let parse = |list: &str| -> Vec<Word> {
            list.split_whitespace()
                .filter_map(|token| Word::new(token).ok())
                .collect()
        };

        let list = Self::new(parse(ANSWERS), parse(GUESSES));
        debug!(
            "built-in word list has {} answers and {} guesses",
            list.len_answers(),
            list.len_guesses()
        );
        list
    }

    /// Loads a word list from an answer file and a guess file.
    ///
    /// Both files are read with [`load_words()`].
    pub fn from_files(answers: impl AsRef<Path>, guesses: impl AsRef<Path>) -> Result<Self> {
        let open = |path: &Path| -> Result<Vec<Word>> {
            let file = File::open(path)?;
            load_words(BufReader::new(file))
        };

        let list = Self::new(open(answers.as_ref())?, open(guesses.as_ref())?);
        info!(
            "loaded {} answers from {} and {} guesses in total",
            list.len_answers(),
            answers.as_ref().display(),
            list.len_guesses()
        );
        Ok(list)
    }

    /// Picks an answer uniformly at random, or [`None`] if there are none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_cl::WordList;
    /// let list = WordList::builtin();
    /// let answer = list.pick_answer(&mut rand::thread_rng()).unwrap();
    /// assert!(list.answers().contains(&answer));
    /// ```
    pub fn pick_answer<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Word> {
        self.answers.choose(rng).copied()
    }

    /// Returns the answer pool.
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    /// Returns true if `word` is an accepted guess.
    pub fn contains(&self, word: &Word) -> bool {
        self.guesses.contains(word)
    }

    /// Gets the number of words in the answer pool.
    pub fn len_answers(&self) -> usize {
        self.answers.len()
    }

    /// Gets the number of accepted guesses, answers included.
    pub fn len_guesses(&self) -> usize {
        self.guesses.len()
    }
}

impl Dictionary for WordList {
    fn is_valid_guess(&self, word: &Word) -> bool {
        self.contains(word)
    }
}
