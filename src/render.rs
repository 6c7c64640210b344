//! Drawing the board, the remaining letters, and statistics for a terminal.

use owo_colors::{AnsiColors, OwoColorize, Stream};

use crate::{
    letters::RemainingLetters,
    puzzle::{ScoredGuess, Verdict},
    round::RoundState,
    word::WORD_LEN,
};

/// How tiles are told apart.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Style {
    /// Bracketed tiles, colored green or yellow when stdout supports color.
    Color,

    /// No color: `[A]` is correct, `(A)` is present, and ` A ` is absent.
    Plain,
}

fn tile(letter: char, verdict: Verdict, style: Style) -> String {
    match style {
        Style::Plain => match verdict {
            Verdict::Correct => format!("[{}]", letter),
            Verdict::Present => format!("({})", letter),
            Verdict::Absent => format!(" {} ", letter),
        },
        Style::Color => {
            let text = format!("[{}]", letter);
            match verdict {
                Verdict::Correct => text
                    .if_supports_color(Stream::Stdout, |t| t.color(AnsiColors::Green))
                    .to_string(),
                Verdict::Present => text
                    .if_supports_color(Stream::Stdout, |t| t.color(AnsiColors::Yellow))
                    .to_string(),
                Verdict::Absent => text,
            }
        }
    }
}

/// Draws one scored guess as a row of tiles.
pub fn render_row(scored: &ScoredGuess, style: Style) -> String {
    scored
        .iter()
        .map(|(letter, verdict)| tile(letter, verdict, style))
        .collect()
}

/// The most empty rows [`render_board()`] draws before summarizing the rest.
pub const MAX_EMPTY_ROWS: usize = 10;

/// Draws the whole board: a row per accepted guess, then empty rows for the
/// guesses still available.
///
/// Past [`MAX_EMPTY_ROWS`] empty rows the board ends with a count of the
/// guesses left instead.
///
/// # Examples
///
/// ```rust
/// use wordle_cl::{render::{render_board, Style}, RoundState, Word};
///
/// let anything = |_: &Word| true;
/// let mut round = RoundState::new(Word::new("crane")?, 3, &anything)?;
/// round.submit_guess("train")?;
///
/// assert_eq!(
///     render_board(&round, Style::Plain),
///     " T [R][A] I (N)\n[ ][ ][ ][ ][ ]\n[ ][ ][ ][ ][ ]"
/// );
/// #
/// # Ok::<_, wordle_cl::WordleError>(())
/// ```
pub fn render_board(round: &RoundState<'_>, style: Style) -> String {
    let empty = "[ ]".repeat(WORD_LEN);
    let left = round.guesses_left();
    let mut rows: Vec<String> = round
        .history()
        .iter()
        .map(|scored| render_row(scored, style))
        .chain(std::iter::repeat(empty).take(left.min(MAX_EMPTY_ROWS)))
        .collect();
    if left > MAX_EMPTY_ROWS {
        rows.push(format!("... {} guesses left", left));
    }
    rows.join("\n")
}

/// Describes the letters not yet ruled out.
pub fn render_remaining(remaining: &RemainingLetters) -> String {
    format!("Letters Remaining ({}): {}", remaining.len(), remaining)
}

/// Lays out every player's totals as a table.
#[cfg(feature = "serde")]
pub fn stats_table(stats: &crate::stats::StatsTable) -> comfy_table::Table {
    use comfy_table::{Cell, Color, Table};

    let mut table = Table::new();
    if !table.is_tty() {
        table.set_table_width(80);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL);
    }
    table.set_header(vec!["Player", "Played", "Won", "Win %", "Avg. guesses"]);

    for (player, totals) in stats.iter() {
        let mean = match totals.mean_guesses() {
            Some(mean) => Cell::new(format!("{:.2}", mean)),
            None => Cell::new("-"),
        };
        let win_rate = Cell::new(format!("{:.1}", totals.win_rate() * 100.));
        let win_rate = if totals.won() > 0 {
            win_rate.fg(Color::Green)
        } else {
            win_rate
        };
        table.add_row(vec![
            Cell::new(player),
            Cell::new(totals.played()),
            Cell::new(totals.won()),
            win_rate,
            mean,
        ]);
    }

    table
}
