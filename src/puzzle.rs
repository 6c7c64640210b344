//! Scoring a guess against an answer.

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::word::{letter_index, Word, WORD_LEN};

/// Feedback for one letter of a guess.
///
/// `Correct` means the letter is in the answer at that position. `Present`
/// means the answer has a copy of the letter somewhere else that no other
/// letter of the guess has claimed. `Absent` means it does not, either because
/// the letter is not in the answer at all or because every copy is taken.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Verdict {
    /// The letter guessed is in the correct position.
    Correct,

    /// The letter guessed is in the answer, but not there.
    Present,

    /// The letter guessed is not in the answer, or all copies are accounted for.
    Absent,
}

/// A guess together with a [`Verdict`] for each of its letters.
///
/// The verdicts are in the same order as the letters of the guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ScoredGuess {
    word: Word,
    verdicts: [Verdict; WORD_LEN],
}

impl ScoredGuess {
    /// The word that was guessed.
    pub fn word(&self) -> &Word {
        &self.word
    }

    /// The verdicts, one per letter of the guess.
    pub fn verdicts(&self) -> &[Verdict; WORD_LEN] {
        &self.verdicts
    }

    /// Iterates over each letter of the guess and its verdict.
    pub fn iter(&self) -> impl Iterator<Item = (char, Verdict)> + '_ {
        self.word.chars().zip(self.verdicts.iter().copied())
    }

    /// Returns true if every letter is [`Verdict::Correct`].
    pub fn is_correct(&self) -> bool {
        self.verdicts.iter().all(|&v| v == Verdict::Correct)
    }
}

impl Display for ScoredGuess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (c, verdict) in self.iter() {
            match verdict {
                Verdict::Correct => write!(f, "[{}]", c)?,
                Verdict::Present => write!(f, "({})", c)?,
                Verdict::Absent => write!(f, " {} ", c)?,
            }
        }
        Ok(())
    }
}

/// Scores `guess` against `answer`.
///
/// Each letter of the answer can be claimed once. Exact matches claim their
/// letters first, then the remaining guess letters claim what is left from
/// left to right. So, for a letter that appears in the answer `n` times, at
/// most `n` positions of the guess get [`Verdict::Correct`] or
/// [`Verdict::Present`] for it. If the answer is `SOBER` and you guess
/// `SPOOL`, the first `O` is `Present` and the second is `Absent`.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::{score, Word, Verdict::*};
///
/// let scored = score(&Word::new("spool")?, &Word::new("sober")?);
/// assert_eq!(scored.verdicts(), &[Correct, Absent, Present, Absent, Absent]);
/// assert!(!scored.is_correct());
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
pub fn score(guess: &Word, answer: &Word) -> ScoredGuess {
    let mut available = answer.letter_counts();
    let mut verdicts = [Verdict::Absent; WORD_LEN];

    // exact matches first, since those get priority
    for (i, (&g, &a)) in guess.letters().iter().zip(answer.letters()).enumerate() {
        if g == a {
            verdicts[i] = Verdict::Correct;
            available[letter_index(g)] -= 1;
        }
    }

    for (verdict, &g) in verdicts.iter_mut().zip(guess.letters()) {
        if *verdict == Verdict::Correct {
            continue;
        }
        let count = &mut available[letter_index(g)];
        if *count > 0 {
            *count -= 1;
            *verdict = Verdict::Present;
        }
    }

    ScoredGuess {
        word: *guess,
        verdicts,
    }
}
