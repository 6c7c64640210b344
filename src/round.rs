//! A single round of the game, from picking the answer to winning or losing.

use std::fmt::Display;

use log::{debug, trace};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    letters::RemainingLetters,
    puzzle::{score, ScoredGuess},
    word::Word,
    words::{Dictionary, WordList},
    GuessError, Result, WordleError,
};

/// Where a round stands.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum RoundOutcome {
    /// The player still has guesses left and has not found the answer.
    InProgress,

    /// The player guessed the answer.
    Won,

    /// The player used every guess without finding the answer.
    Lost,
}

impl Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Guess budget presets.
///
/// The round itself accepts any budget of at least one guess; these are just
/// the usual choices.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Difficulty {
    /// Eight guesses.
    Easy,

    /// Six guesses, like the newspaper game.
    Normal,

    /// Four guesses.
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

impl Difficulty {
    /// The number of guesses a round on this difficulty allows.
    pub fn budget(&self) -> usize {
        match self {
            Self::Easy => 8,
            Self::Normal => 6,
            Self::Hard => 4,
        }
    }
}

/// What the statistics store is told once a round is over.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct RoundReport {
    pub player: String,
    pub outcome: RoundOutcome,
    pub guesses: usize,
    pub budget: usize,
    pub answer: Word,
}

/// The state of one round.
///
/// A round is created with its answer, a guess budget, and the
/// [`Dictionary`] guesses are checked against. Feed it raw guesses with
/// [`submit_guess()`](RoundState::submit_guess()) until
/// [`is_over()`](RoundState::is_over()) returns true. Guesses that are
/// rejected cost nothing, so the caller can simply ask again.
///
/// Nothing is shared between rounds; make a new [`RoundState`] for each one.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::{GuessError, RoundOutcome, RoundState, Word, WordList};
///
/// let words = WordList::builtin();
/// let mut round = RoundState::new(Word::new("crane")?, 6, &words)?;
///
/// assert_eq!(round.submit_guess("crab"), Err(GuessError::WrongLength(4)));
/// assert!(round.submit_guess("xxxxx").is_err());
/// assert_eq!(round.guesses_used(), 0);
///
/// let scored = round.submit_guess("train")?;
/// assert!(!scored.is_correct());
/// assert_eq!(round.outcome(), RoundOutcome::InProgress);
///
/// round.submit_guess("CRANE")?;
/// assert_eq!(round.outcome(), RoundOutcome::Won);
/// assert_eq!(round.history().len(), 2);
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
pub struct RoundState<'d> {
    answer: Word,
    dictionary: &'d dyn Dictionary,
    history: Vec<ScoredGuess>,
    remaining: RemainingLetters,
    budget: usize,
    outcome: RoundOutcome,
}

impl<'d> RoundState<'d> {
    /// Starts a round with the given answer and number of guesses.
    ///
    /// Returns [`WordleError::InvalidBudget`] if `budget` is zero.
    pub fn new(answer: Word, budget: usize, dictionary: &'d dyn Dictionary) -> Result<Self> {
        if budget == 0 {
            return Err(WordleError::InvalidBudget(budget));
        }

        Ok(Self::start(answer, budget, dictionary))
    }

    /// Starts a round with the budget of a [`Difficulty`] preset.
    pub fn with_difficulty(
        answer: Word,
        difficulty: Difficulty,
        dictionary: &'d dyn Dictionary,
    ) -> Self {
        Self::start(answer, difficulty.budget(), dictionary)
    }

    // `budget` must be at least one. The history grows as guesses come in,
    // since the budget can be arbitrarily large.
    fn start(answer: Word, budget: usize, dictionary: &'d dyn Dictionary) -> Self {
        debug!("starting a round with {} guesses", budget);
        RoundState {
            answer,
            dictionary,
            history: Vec::new(),
            remaining: RemainingLetters::new(),
            budget,
            outcome: RoundOutcome::InProgress,
        }
    }

    /// Starts a round with an answer picked at random from `words`, which also
    /// serves as the dictionary.
    pub fn random<R: Rng + ?Sized>(words: &'d WordList, budget: usize, rng: &mut R) -> Result<Self> {
        let answer = words.pick_answer(rng).ok_or(WordleError::EmptyAnswerPool)?;
        Self::new(answer, budget, words)
    }

    /// Checks a raw guess and, if it is acceptable, plays it.
    ///
    /// The guess is trimmed and uppercased first. It is rejected with
    /// [`GuessError::WrongLength`] unless it has five letters, with
    /// [`GuessError::NotInDictionary`] if the dictionary does not know it, and
    /// with [`GuessError::RoundOver`] once the round has been decided. A
    /// rejected guess leaves the round exactly as it was.
    ///
    /// An accepted guess is scored, added to the history, and used to narrow
    /// the remaining letters. The round is won if the guess is the answer and
    /// lost if that was the last guess in the budget.
    pub fn submit_guess(&mut self, raw: &str) -> Result<ScoredGuess, GuessError> {
        if self.is_over() {
            return Err(GuessError::RoundOver);
        }

        let guess = Word::new(raw).map_err(|e| {
            trace!("rejected {:?}: {}", raw, e);
            e
        })?;
        if !self.dictionary.is_valid_guess(&guess) {
            trace!("rejected {}: not in the dictionary", guess);
            return Err(GuessError::NotInDictionary(guess.to_string()));
        }

        let scored = score(&guess, &self.answer);
        self.history.push(scored);
        self.remaining.update(&guess, &self.answer);

        if guess == self.answer {
            self.outcome = RoundOutcome::Won;
        } else if self.history.len() >= self.budget {
            self.outcome = RoundOutcome::Lost;
        }

        debug!(
            "guess {}/{}: {} ({})",
            self.history.len(),
            self.budget,
            scored,
            self.outcome
        );
        Ok(scored)
    }

    /// Where the round stands.
    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    /// Returns true once the round has been won or lost.
    pub fn is_over(&self) -> bool {
        self.outcome != RoundOutcome::InProgress
    }

    /// The accepted guesses, in the order they were made.
    pub fn history(&self) -> &[ScoredGuess] {
        &self.history
    }

    /// The letters not yet ruled out.
    pub fn remaining_letters(&self) -> &RemainingLetters {
        &self.remaining
    }

    /// The total number of guesses this round allows.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// The number of guesses accepted so far.
    pub fn guesses_used(&self) -> usize {
        self.history.len()
    }

    /// The number of guesses the player has left.
    pub fn guesses_left(&self) -> usize {
        self.budget - self.history.len()
    }

    /// The answer, once the round is over. While the round is in progress
    /// this returns [`None`].
    pub fn answer(&self) -> Option<&Word> {
        self.is_over().then(|| &self.answer)
    }

    /// Produces the report for the statistics store, once the round is over.
    pub fn report(&self, player: impl Into<String>) -> Option<RoundReport> {
        self.is_over().then(|| RoundReport {
            player: player.into(),
            outcome: self.outcome,
            guesses: self.history.len(),
            budget: self.budget,
            answer: self.answer,
        })
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::puzzle::Verdict::*;

    fn word(s: &str) -> Word {
        Word::new(s).unwrap()
    }

    fn anything(_: &Word) -> bool {
        true
    }

    #[test]
    fn crane_in_two() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("crane"), 6, &anything)?;

        let first = round.submit_guess("train")?;
        assert_eq!(first.verdicts(), &[Absent, Correct, Correct, Absent, Present]);
        assert_eq!(round.outcome(), RoundOutcome::InProgress);
        assert_eq!(round.answer(), None);

        let second = round.submit_guess("crane")?;
        assert!(second.is_correct());
        assert_eq!(round.outcome(), RoundOutcome::Won);
        assert_eq!(round.guesses_used(), 2);
        assert_eq!(round.guesses_left(), 4);
        assert_eq!(round.answer(), Some(&word("crane")));

        Ok(())
    }

    #[test]
    fn huge_budgets_are_fine() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("crane"), usize::MAX, &anything)?;
        round.submit_guess("train")?;
        assert_eq!(round.outcome(), RoundOutcome::InProgress);
        assert_eq!(round.guesses_used(), 1);
        assert_eq!(round.guesses_left(), usize::MAX - 1);
        Ok(())
    }

    #[test]
    fn difficulty_sets_the_budget() -> Result<(), WordleError> {
        let mut round = RoundState::with_difficulty(word("crane"), Difficulty::Hard, &anything);
        assert_eq!(round.budget(), 4);
        for guess in ["train", "speed", "erase", "sober"] {
            round.submit_guess(guess)?;
        }
        assert_eq!(round.outcome(), RoundOutcome::Lost);
        Ok(())
    }

    #[test]
    fn runs_out_of_guesses() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("speed"), 3, &anything)?;
        for guess in ["erase", "crane", "train"] {
            assert_eq!(round.outcome(), RoundOutcome::InProgress);
            round.submit_guess(guess)?;
        }
        assert_eq!(round.outcome(), RoundOutcome::Lost);
        assert_eq!(round.guesses_used(), 3);
        assert_eq!(round.guesses_left(), 0);
        Ok(())
    }

    #[test]
    fn winning_on_the_last_guess() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("speed"), 2, &anything)?;
        round.submit_guess("erase")?;
        round.submit_guess("speed")?;
        assert_eq!(round.outcome(), RoundOutcome::Won);
        Ok(())
    }

    #[test]
    fn budget_of_one() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("speed"), 1, &anything)?;
        round.submit_guess("erase")?;
        assert_eq!(round.outcome(), RoundOutcome::Lost);
        Ok(())
    }

    #[test]
    fn zero_budget_is_refused() {
        assert!(matches!(
            RoundState::new(word("speed"), 0, &anything),
            Err(WordleError::InvalidBudget(0))
        ));
    }

    #[test]
    fn rejection_is_free() -> Result<(), WordleError> {
        let only_real = |w: &Word| ["CRANE", "TRAIN"].contains(&w.to_string().as_str());
        let mut round = RoundState::new(word("crane"), 6, &only_real)?;
        round.submit_guess("train")?;
        let before = (round.history().to_vec(), *round.remaining_letters());

        assert_eq!(round.submit_guess("tra"), Err(GuessError::WrongLength(3)));
        assert_eq!(round.submit_guess("trains"), Err(GuessError::WrongLength(6)));
        assert_eq!(
            round.submit_guess("xyzzy"),
            Err(GuessError::NotInDictionary("XYZZY".to_string()))
        );
        assert_eq!(
            round.submit_guess("tr1in"),
            Err(GuessError::NotInDictionary("TR1IN".to_string()))
        );

        assert_eq!(round.guesses_used(), 1);
        assert_eq!(round.outcome(), RoundOutcome::InProgress);
        assert_eq!((round.history().to_vec(), *round.remaining_letters()), before);
        Ok(())
    }

    #[test]
    fn no_guesses_after_the_end() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("crane"), 6, &anything)?;
        round.submit_guess("crane")?;
        assert_eq!(round.submit_guess("train"), Err(GuessError::RoundOver));
        assert_eq!(round.guesses_used(), 1);
        assert_eq!(round.outcome(), RoundOutcome::Won);
        Ok(())
    }

    #[test]
    fn tracks_remaining_letters() -> Result<(), WordleError> {
        let mut round = RoundState::new(word("speed"), 6, &anything)?;
        round.submit_guess("erase")?;
        let remaining = round.remaining_letters();
        assert_eq!(remaining.len(), 24);
        assert!(remaining.contains('E'));
        assert!(!remaining.contains('R'));
        Ok(())
    }

    #[test]
    fn reports_only_when_over() -> Result<(), WordleError> {
        let mut round = RoundState::with_difficulty(word("crane"), Difficulty::Hard, &anything);
        assert_eq!(round.budget(), 4);
        assert_eq!(round.report("marc"), None);

        round.submit_guess("crane")?;
        let report = round.report("marc").unwrap();
        assert_eq!(report.player, "marc");
        assert_eq!(report.outcome, RoundOutcome::Won);
        assert_eq!(report.guesses, 1);
        assert_eq!(report.budget, 4);
        assert_eq!(report.answer, word("crane"));
        Ok(())
    }

    #[test]
    fn random_rounds_use_the_list() -> Result<(), WordleError> {
        let words = WordList::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = RoundState::random(&words, Difficulty::Normal.budget(), &mut rng)?;
        assert_eq!(
            round.submit_guess("zzzzz"),
            Err(GuessError::NotInDictionary("ZZZZZ".to_string()))
        );
        round.submit_guess("crane")?;
        assert_eq!(round.guesses_used(), 1);
        Ok(())
    }

    #[test]
    fn random_rounds_need_answers() {
        let words = WordList::new(Vec::new(), vec![word("crane")]);
        assert!(matches!(
            RoundState::random(&words, 6, &mut rand::thread_rng()),
            Err(WordleError::EmptyAnswerPool)
        ));
    }

    #[test]
    fn difficulty_presets() {
        assert!(Difficulty::Hard.budget() < Difficulty::Normal.budget());
        assert!(Difficulty::Normal.budget() < Difficulty::Easy.budget());
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }

    fn word_strategy() -> impl Strategy<Value = Word> {
        "[a-e]{5}".prop_map(|s| Word::new(&s).unwrap())
    }

    proptest! {
        #[test]
        fn loses_after_exactly_budget_misses(
            budget in 1_usize..10,
            guesses in proptest::collection::vec(word_strategy(), 10)
        ) {
            // the answer uses letters no guess can contain
            let answer = word("vwxyz");
            let mut round = RoundState::new(answer, budget, &anything).unwrap();
            for (i, guess) in guesses.iter().enumerate() {
                let res = round.submit_guess(&guess.to_string());
                if i < budget {
                    prop_assert!(res.is_ok());
                } else {
                    prop_assert_eq!(res, Err(GuessError::RoundOver));
                }
                let expected = if i + 1 >= budget {
                    RoundOutcome::Lost
                } else {
                    RoundOutcome::InProgress
                };
                prop_assert_eq!(round.outcome(), expected);
            }
            prop_assert_eq!(round.guesses_used(), budget);
        }

        #[test]
        fn history_keeps_submission_order(guesses in proptest::collection::vec(word_strategy(), 1..6)) {
            let mut round = RoundState::new(word("vwxyz"), 6, &anything).unwrap();
            for guess in guesses.iter() {
                round.submit_guess(&guess.to_string().to_lowercase()).unwrap();
            }
            let played: Vec<Word> = round.history().iter().map(|s| *s.word()).collect();
            prop_assert_eq!(played, guesses);
        }
    }
}
