use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use clap::{Parser, ValueEnum};
use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};
use wordle_cl::{
    record_round,
    render::{render_board, render_remaining, render_row, stats_table, Style},
    score,
    stats::{StatsLog, StatsTable},
    Difficulty, GuessError, RoundOutcome, RoundState, Word, WordList, WordleError,
};

/// Guess the five-letter word.
#[derive(Parser, Debug)]
#[command(name = "wordle_runner", version, about, long_about = None)]
struct Args {
    /// Name statistics are kept under
    #[arg(long, env = "WORDLE_PLAYER", default_value = "player")]
    player: String,

    /// Guess budget preset
    #[arg(long, value_enum, env = "WORDLE_DIFFICULTY", default_value = "normal")]
    difficulty: Level,

    /// Exact number of guesses per round, overriding the difficulty
    #[arg(long)]
    budget: Option<usize>,

    /// File of possible answers, whitespace separated
    #[arg(long, requires = "allowed")]
    answers: Option<PathBuf>,

    /// File of extra accepted guesses, whitespace separated
    #[arg(long, requires = "answers")]
    allowed: Option<PathBuf>,

    /// Per-player statistics file (created if it doesn't exist)
    #[arg(long, env = "WORDLE_STATS", default_value = "wordle_stats.json")]
    stats: PathBuf,

    /// Also append every finished round to this JSON-lines file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Mark tiles with brackets instead of color
    #[arg(long)]
    plain: bool,

    /// Skip the welcome message and instructions
    #[arg(long)]
    skip_intro: bool,

    /// Seed for picking answers
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Normal,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Normal => Difficulty::Normal,
            Level::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<(), WordleError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let words = match (&args.answers, &args.allowed) {
        (Some(answers), Some(allowed)) => WordList::from_files(answers, allowed)?,
        _ => WordList::builtin(),
    };
    let budget = args
        .budget
        .unwrap_or_else(|| Difficulty::from(args.difficulty).budget());
    let style = if args.plain { Style::Plain } else { Style::Color };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut table = open_table(&args.stats);
    let mut log = args.log.as_deref().and_then(open_log);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if !args.skip_intro {
        display_welcome_message();
        if !display_instructions(&mut input, budget, style)? {
            return Ok(());
        }
    }

    loop {
        let mut round = RoundState::random(&words, budget, &mut rng)?;
        if !play(&mut round, &mut input, style)? {
            debug!("input closed mid-round");
            break;
        }

        let answer = round.answer().map(ToString::to_string).unwrap_or_default();
        match round.outcome() {
            RoundOutcome::Won => println!("\nCongratulations! You guessed the word: {}", answer),
            RoundOutcome::Lost => println!(
                "\nThe correct word was: {}\n\nSorry, you failed to guess in {} tries.",
                answer,
                round.budget()
            ),
            RoundOutcome::InProgress => {}
        }

        if let Some(report) = round.report(&args.player) {
            record_round(&mut table, &report);
            if let Some(log) = log.as_mut() {
                record_round(log, &report);
            }
        }

        match prompt(&mut input, "\nWould you like to play again? (y/n): ")? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    if let Some(totals) = table.get(&args.player) {
        println!("\nGuess distribution for {}:", args.player);
        print!("{}", totals.histogram());
    }
    if !table.is_empty() {
        println!("{}", stats_table(&table));
    }
    println!("\n\nThank you for playing!\n");

    Ok(())
}

/// Plays guesses from `input` until the round is decided. Returns false if
/// the input ran out first.
fn play(round: &mut RoundState<'_>, input: &mut impl BufRead, style: Style) -> io::Result<bool> {
    while !round.is_over() {
        let line = match prompt(input, "\nEnter a 5-Letter Word: ")? {
            Some(line) => line,
            None => return Ok(false),
        };

        match round.submit_guess(&line) {
            Ok(_) => {
                println!("{}", render_board(round, style));
                println!("\n{}", render_remaining(round.remaining_letters()));
            }
            Err(GuessError::WrongLength(_)) => println!("Word must be exactly 5 letters."),
            Err(GuessError::NotInDictionary(_)) => println!("Word not found."),
            Err(GuessError::RoundOver) => break,
        }
    }

    Ok(true)
}

/// Prints `message` and reads one line, or [`None`] at the end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn display_welcome_message() {
    println!("Welcome to Wordle CL!\n");
    thread::sleep(Duration::from_secs(1));
}

/// Explains the rules and waits for the player. Returns false if the input
/// ran out instead.
fn display_instructions(
    input: &mut impl BufRead,
    budget: usize,
    style: Style,
) -> Result<bool, WordleError> {
    let example = |guess: &str, answer: &str| -> Result<String, WordleError> {
        let scored = score(&Word::new(guess)?, &Word::new(answer)?);
        Ok(render_row(&scored, style))
    };

    println!("INSTRUCTIONS:");
    println!("Guess the WORDLE in {} tries.", budget);
    println!("Each guess must be a valid 5-letter word.");
    println!("After each guess, the board will show how close your guess was to the word.\n");
    println!("EXAMPLES:");
    println!("{}", example("weary", "whoop")?);
    println!("The letter \"W\" is in the word in the correct spot.\n");
    println!("{}", example("pills", "think")?);
    println!("The letter \"I\" is in the word in the wrong spot.\n");
    println!("{}", example("vague", "think")?);
    println!("None of these letters are in the word.\n");

    loop {
        match prompt(input, "Type \"c\" to continue: ")? {
            Some(line) if line.trim() == "c" => return Ok(true),
            Some(_) => println!("Invalid input."),
            None => return Ok(false),
        }
    }
}

fn open_table(path: &Path) -> StatsTable {
    StatsTable::open(path).unwrap_or_else(|e| {
        warn!(
            "could not open statistics at {}: {}; keeping them in memory",
            path.display(),
            e
        );
        StatsTable::new()
    })
}

fn open_log(path: &Path) -> Option<StatsLog<std::fs::File>> {
    StatsLog::append(path)
        .map_err(|e| warn!("could not open round log at {}: {}", path.display(), e))
        .ok()
}
