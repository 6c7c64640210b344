//! Recording finished rounds.
//!
//! The game only hands a [`RoundReport`] to a [`StatsSink`] once a round is
//! over. Sinks own their storage and their failures: [`record_round()`] logs
//! whatever goes wrong and carries on, so a broken statistics file never gets
//! in the way of playing.

use log::{debug, info, warn};

use crate::{round::RoundReport, StatsError};

#[cfg(feature = "serde")]
pub use self::store::{Histogram, PlayerStats, StatsLog, StatsTable, BAR_WIDTH};

/// Somewhere finished rounds are kept.
pub trait StatsSink {
    /// Adds a player to the store.
    ///
    /// Stores that key players by name return [`StatsError::PlayerExists`]
    /// when the name is already taken.
    fn register_player(&mut self, player: &str) -> Result<(), StatsError>;

    /// Stores the result of one round.
    fn record(&mut self, report: &RoundReport) -> Result<(), StatsError>;
}

/// Registers the report's player and records the round, logging any failure.
///
/// A player that already exists is expected and only noted at debug level.
/// Returns true if the round itself was stored.
pub fn record_round<S: StatsSink + ?Sized>(sink: &mut S, report: &RoundReport) -> bool {
    match sink.register_player(&report.player) {
        Ok(()) => info!("registered new player {}", report.player),
        Err(StatsError::PlayerExists(player)) => debug!("player {} already registered", player),
        Err(e) => warn!("could not register player {}: {}", report.player, e),
    }

    match sink.record(report) {
        Ok(()) => {
            debug!("recorded a {} round for {}", report.outcome, report.player);
            true
        }
        Err(e) => {
            warn!("could not record round for {}: {}", report.player, e);
            false
        }
    }
}

#[cfg(feature = "serde")]
mod store {
    use std::{
        collections::BTreeMap,
        fmt::Display,
        ffi::OsString,
        fs::{self, File, OpenOptions},
        io::{BufReader, BufWriter, ErrorKind, Read, Write},
        ops::Deref,
        path::{Path, PathBuf},
    };

    use log::debug;
    use serde::{Deserialize, Serialize};

    use super::StatsSink;
    use crate::{
        round::{RoundOutcome, RoundReport},
        StatsError,
    };

    /// An append-only log with one JSON object per finished round.
    ///
    /// Players are not tracked separately, so registering always succeeds.
    #[derive(Debug)]
    pub struct StatsLog<W: Write> {
        writer: W,
    }

    impl StatsLog<File> {
        /// Opens `path` for appending, creating it if needed.
        pub fn append(path: impl AsRef<Path>) -> Result<Self, StatsError> {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path.as_ref())?;
            debug!("appending round log to {}", path.as_ref().display());
            Ok(Self::new(file))
        }
    }

    impl<W: Write> StatsLog<W> {
        /// Creates a log that writes to `writer`.
        pub fn new(writer: W) -> Self {
            StatsLog { writer }
        }

        /// Gives back the underlying writer.
        pub fn into_inner(self) -> W {
            self.writer
        }
    }

    impl<W: Write> StatsSink for StatsLog<W> {
        fn register_player(&mut self, _player: &str) -> Result<(), StatsError> {
            Ok(())
        }

        fn record(&mut self, report: &RoundReport) -> Result<(), StatsError> {
            serde_json::to_writer(&mut self.writer, report)?;
            writeln!(self.writer)?;
            self.writer.flush()?;
            Ok(())
        }
    }

    /// The length of the longest bar a [`Histogram`] draws.
    pub const BAR_WIDTH: usize = 30;

    /// How many wins took each number of guesses.
    ///
    /// Bin `i` counts wins in `i + 1` guesses. The histogram grows to fit
    /// whatever budgets the player has used, and remembers the guess count of
    /// the latest win so it can be pointed out when drawn.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(crate = "serde_crate")]
    pub struct Histogram {
        bins: Vec<u32>,
        #[serde(default)]
        latest: Option<usize>,
    }

    impl Histogram {
        /// Counts a win that took `guesses` guesses.
        pub fn add(&mut self, guesses: usize) {
            if guesses == 0 {
                return;
            }
            if self.bins.len() < guesses {
                self.bins.resize(guesses, 0);
            }
            self.bins[guesses - 1] += 1;
            self.latest = Some(guesses);
        }

        /// The number of guesses the most recent win took.
        pub fn latest(&self) -> Option<usize> {
            self.latest
        }
    }

    impl Deref for Histogram {
        type Target = [u32];

        fn deref(&self) -> &Self::Target {
            &self.bins
        }
    }

    impl Display for Histogram {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            // bars are scaled so the most common guess count fills the width
            let most = self.bins.iter().copied().max().unwrap_or(0).max(1) as usize;
            let label = self.bins.len().to_string().len();

            for (i, &wins) in self.bins.iter().enumerate() {
                let guesses = i + 1;
                let bar = match wins as usize {
                    0 => 0,
                    wins => (wins * BAR_WIDTH / most).max(1),
                };
                write!(
                    f,
                    "{:>label$} |{} {}",
                    guesses,
                    "■".repeat(bar),
                    wins,
                    label = label
                )?;
                if self.latest == Some(guesses) {
                    write!(f, " <")?;
                }
                writeln!(f)?;
            }

            Ok(())
        }
    }

    /// One player's totals.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(crate = "serde_crate")]
    pub struct PlayerStats {
        played: u32,
        won: u32,
        histogram: Histogram,
    }

    impl PlayerStats {
        /// Gets the number of rounds played.
        pub fn played(&self) -> u32 {
            self.played
        }

        /// Gets the number of rounds won.
        pub fn won(&self) -> u32 {
            self.won
        }

        /// Gets the number of rounds lost.
        pub fn lost(&self) -> u32 {
            // a hand-edited file may claim more wins than rounds
            self.played.saturating_sub(self.won)
        }

        /// Gets the fraction of rounds won, or zero before the first round.
        pub fn win_rate(&self) -> f32 {
            if self.played == 0 {
                0.
            } else {
                (self.won as f32 / self.played as f32).min(1.)
            }
        }

        /// Gets the average number of guesses in won rounds.
        ///
        /// Lost rounds are not counted. Returns [`None`] before the first win.
        pub fn mean_guesses(&self) -> Option<f32> {
            if self.won == 0 {
                return None;
            }
            let total: u32 = self
                .histogram
                .iter()
                .enumerate()
                .map(|(i, &n)| (i as u32 + 1) * n)
                .sum();
            Some(total as f32 / self.won as f32)
        }

        /// The guess distribution of won rounds.
        pub fn histogram(&self) -> &Histogram {
            &self.histogram
        }

        fn add(&mut self, report: &RoundReport) {
            self.played += 1;
            if report.outcome == RoundOutcome::Won {
                self.won += 1;
                self.histogram.add(report.guesses);
            }
        }
    }

    /// Totals for each player, keyed by name.
    ///
    /// A table opened with [`open()`](StatsTable::open()) saves itself to its
    /// file after every change. One made with [`new()`](StatsTable::new()) or
    /// [`load()`](StatsTable::load()) lives in memory until
    /// [`save()`](StatsTable::save()) is called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wordle_cl::{
    ///     stats::StatsTable, Difficulty, RoundOutcome, RoundReport, StatsError, StatsSink, Word,
    /// };
    ///
    /// let mut table = StatsTable::new();
    /// table.register_player("marc")?;
    /// assert!(matches!(
    ///     table.register_player("marc"),
    ///     Err(StatsError::PlayerExists(_))
    /// ));
    ///
    /// table.record(&RoundReport {
    ///     player: "marc".to_string(),
    ///     outcome: RoundOutcome::Won,
    ///     guesses: 3,
    ///     budget: Difficulty::Normal.budget(),
    ///     answer: Word::new("crane")?,
    /// })?;
    /// assert_eq!(table.get("marc").unwrap().played(), 1);
    /// #
    /// # Ok::<_, wordle_cl::WordleError>(())
    /// ```
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(crate = "serde_crate")]
    pub struct StatsTable {
        players: BTreeMap<String, PlayerStats>,
        #[serde(skip)]
        path: Option<PathBuf>,
    }

    impl StatsTable {
        /// Creates an empty table that is not backed by a file.
        pub fn new() -> Self {
            Self::default()
        }

        /// Opens the table stored at `path`.
        ///
        /// A missing file is treated as an empty table; it is created on the
        /// first change.
        pub fn open(path: impl Into<PathBuf>) -> Result<Self, StatsError> {
            let path = path.into();
            let mut table = match File::open(&path) {
                Ok(file) => Self::load(BufReader::new(file))?,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("no statistics at {} yet", path.display());
                    Self::new()
                }
                Err(e) => return Err(e.into()),
            };
            table.path = Some(path);
            Ok(table)
        }

        /// Reads a table from JSON.
        pub fn load(reader: impl Read) -> Result<Self, StatsError> {
            Ok(serde_json::from_reader(reader)?)
        }

        /// Writes the table as JSON.
        pub fn save(&self, mut writer: impl Write) -> Result<(), StatsError> {
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
            Ok(())
        }

        /// Gets one player's totals.
        pub fn get(&self, player: &str) -> Option<&PlayerStats> {
            self.players.get(player)
        }

        /// Iterates over players in name order.
        pub fn iter(&self) -> impl Iterator<Item = (&str, &PlayerStats)> {
            self.players.iter().map(|(name, stats)| (name.as_str(), stats))
        }

        /// Gets the number of players.
        pub fn len(&self) -> usize {
            self.players.len()
        }

        /// Returns true if no player has been registered.
        pub fn is_empty(&self) -> bool {
            self.players.is_empty()
        }

        /// Rewrites the backing file, if any.
        ///
        /// The table is written next to the file first and then renamed over
        /// it, so a failed write leaves the previous totals in place.
        fn persist(&self) -> Result<(), StatsError> {
            if let Some(path) = &self.path {
                let staging = staging_path(path);
                let written = File::create(&staging)
                    .map_err(StatsError::from)
                    .and_then(|file| self.save(BufWriter::new(file)));
                if let Err(e) = written {
                    let _ = fs::remove_file(&staging);
                    return Err(e);
                }
                fs::rename(&staging, path)?;
            }
            Ok(())
        }
    }

    /// Where a table is written before it replaces the file at `path`.
    pub(super) fn staging_path(path: &Path) -> PathBuf {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    impl StatsSink for StatsTable {
        fn register_player(&mut self, player: &str) -> Result<(), StatsError> {
            if self.players.contains_key(player) {
                return Err(StatsError::PlayerExists(player.to_string()));
            }
            self.players.insert(player.to_string(), PlayerStats::default());
            self.persist()
        }

        fn record(&mut self, report: &RoundReport) -> Result<(), StatsError> {
            self.players
                .entry(report.player.clone())
                .or_default()
                .add(report);
            self.persist()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{round::RoundOutcome, word::Word};

    fn report(player: &str, outcome: RoundOutcome, guesses: usize) -> RoundReport {
        RoundReport {
            player: player.to_string(),
            outcome,
            guesses,
            budget: 6,
            answer: Word::new("crane").unwrap(),
        }
    }

    struct Broken;

    impl StatsSink for Broken {
        fn register_player(&mut self, _player: &str) -> Result<(), StatsError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into())
        }

        fn record(&mut self, _report: &RoundReport) -> Result<(), StatsError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into())
        }
    }

    #[test]
    fn broken_sinks_are_survivable() {
        assert!(!record_round(&mut Broken, &report("marc", RoundOutcome::Won, 2)));
    }

    #[cfg(feature = "serde")]
    mod store {
        use super::*;

        #[test]
        fn counts_plays_and_wins() {
            let mut table = StatsTable::new();
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Won, 3)));
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Lost, 6)));
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Won, 5)));
            assert!(record_round(&mut table, &report("ana", RoundOutcome::Won, 1)));

            let marc = table.get("marc").unwrap();
            assert_eq!(marc.played(), 3);
            assert_eq!(marc.won(), 2);
            assert_eq!(marc.lost(), 1);
            assert_eq!(marc.mean_guesses(), Some(4.));
            assert_eq!(&marc.histogram()[..], &[0, 0, 1, 0, 1]);

            let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
            assert_eq!(names, ["ana", "marc"]);
        }

        #[test]
        fn existing_players_do_not_block_recording() {
            let mut table = StatsTable::new();
            table.register_player("marc").unwrap();
            assert!(matches!(
                table.register_player("marc"),
                Err(StatsError::PlayerExists(name)) if name == "marc"
            ));
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Lost, 6)));
            assert_eq!(table.get("marc").unwrap().played(), 1);
            assert_eq!(table.len(), 1);
        }

        #[test]
        fn new_players_start_empty() {
            let stats = PlayerStats::default();
            assert_eq!(stats.win_rate(), 0.);
            assert_eq!(stats.mean_guesses(), None);
        }

        #[test]
        fn table_survives_json() {
            let mut table = StatsTable::new();
            record_round(&mut table, &report("marc", RoundOutcome::Won, 2));
            record_round(&mut table, &report("ana", RoundOutcome::Lost, 4));

            let mut buf = Vec::new();
            table.save(&mut buf).unwrap();
            let loaded = StatsTable::load(buf.as_slice()).unwrap();
            assert_eq!(loaded, table);
        }

        #[test]
        fn garbage_is_an_error() {
            assert!(matches!(
                StatsTable::load("{ not json".as_bytes()),
                Err(StatsError::Serde(_))
            ));
        }

        #[test]
        fn log_writes_one_line_per_round() {
            let mut log = StatsLog::new(Vec::new());
            let first = report("marc", RoundOutcome::Won, 2);
            let second = report("marc", RoundOutcome::Lost, 6);
            assert!(record_round(&mut log, &first));
            assert!(record_round(&mut log, &second));

            let written = String::from_utf8(log.into_inner()).unwrap();
            let rounds: Vec<RoundReport> = written
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect();
            assert_eq!(rounds, vec![first, second]);
        }

        #[test]
        fn histogram_has_a_line_per_bin() {
            let mut histogram = Histogram::default();
            histogram.add(2);
            histogram.add(2);
            histogram.add(4);
            histogram.add(0);
            assert_eq!(&histogram[..], &[0, 2, 0, 1]);

            assert_eq!(histogram.latest(), Some(4));

            let drawn = histogram.to_string();
            let lines: Vec<&str> = drawn.lines().collect();
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[0], "1 | 0");
            assert_eq!(lines[1], format!("2 |{} 2", "■".repeat(BAR_WIDTH)));
            assert_eq!(lines[2], "3 | 0");
            assert_eq!(lines[3], format!("4 |{} 1 <", "■".repeat(BAR_WIDTH / 2)));
        }

        #[test]
        fn histogram_labels_line_up() {
            let mut histogram = Histogram::default();
            histogram.add(10);
            histogram.add(1);
            let drawn = histogram.to_string();
            let lines: Vec<&str> = drawn.lines().collect();
            assert_eq!(lines.len(), 10);
            assert_eq!(lines[0], format!(" 1 |{} 1 <", "■".repeat(BAR_WIDTH)));
            assert_eq!(lines[9], format!("10 |{} 1", "■".repeat(BAR_WIDTH)));
        }

        #[test]
        fn more_wins_than_rounds_does_not_underflow() {
            let json = r#"{"players":{"marc":{"played":1,"won":3,"histogram":{"bins":[3]}}}}"#;
            let table = StatsTable::load(json.as_bytes()).unwrap();
            let marc = table.get("marc").unwrap();
            assert_eq!(marc.lost(), 0);
            assert_eq!(marc.win_rate(), 1.);
            assert_eq!(marc.histogram().latest(), None);
        }

        #[test]
        fn opened_tables_save_every_change() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("stats.json");

            let mut table = StatsTable::open(path.clone()).unwrap();
            assert!(table.is_empty());
            assert!(!path.exists());

            assert!(record_round(&mut table, &report("marc", RoundOutcome::Won, 3)));
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Lost, 6)));
            assert!(path.exists());

            let reopened = StatsTable::open(path.clone()).unwrap();
            let marc = reopened.get("marc").unwrap();
            assert_eq!(marc.played(), 2);
            assert_eq!(marc.won(), 1);
            assert_eq!(&marc.histogram()[..], &[0, 0, 1]);

            // nothing but the table itself is left behind
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        }

        #[test]
        fn failed_saves_keep_the_old_totals() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("stats.json");

            let mut table = StatsTable::open(path.clone()).unwrap();
            assert!(record_round(&mut table, &report("marc", RoundOutcome::Won, 2)));

            // a directory where the staging file should go makes the next save fail
            std::fs::create_dir(crate::stats::store::staging_path(&path)).unwrap();
            assert!(!record_round(&mut table, &report("marc", RoundOutcome::Lost, 6)));

            let reopened = StatsTable::open(path.clone()).unwrap();
            let marc = reopened.get("marc").unwrap();
            assert_eq!(marc.played(), 1);
            assert_eq!(marc.won(), 1);
        }

        #[test]
        fn opening_garbage_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("stats.json");
            std::fs::write(&path, "not json").unwrap();
            assert!(matches!(StatsTable::open(path), Err(StatsError::Serde(_))));
        }

        #[test]
        fn appended_logs_keep_every_round() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("rounds.jsonl");
            let rounds = [
                report("marc", RoundOutcome::Won, 2),
                report("ana", RoundOutcome::Lost, 6),
            ];

            // a fresh log per round, as separate sessions would open it
            for round in rounds.iter() {
                let mut log = StatsLog::append(&path).unwrap();
                assert!(record_round(&mut log, round));
            }

            let written = std::fs::read_to_string(&path).unwrap();
            let read: Vec<RoundReport> = written
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect();
            assert_eq!(read, rounds);
        }
    }
}
