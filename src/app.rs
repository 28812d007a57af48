// The interactive console: a line-oriented command loop over stdin.
//
// Commands mirror the operations the core exposes: `update` (alias
// `manual`) enters or corrects a result, `print` dumps the schedule and
// standings, `run` drives the Monte Carlo aggregator, `save` writes the
// schedule back out, `quit` exits. All parsing is validation-first: bad
// input reports an `InputError` and mutates nothing.

use std::io::{self, BufRead, Write};
use std::path::Path;

use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::SimConfig;
use crate::league::loader;
use crate::league::{InputError, League};
use crate::report;
use crate::sim::{aggregate, results};

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Update,
    Print,
    Run,
    Save,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Command {
        match input.trim() {
            "quit" => Command::Quit,
            "update" | "manual" => Command::Update,
            "print" => Command::Print,
            "run" => Command::Run,
            "save" => Command::Save,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Parse a `homeScore-awayScore` entry.
pub fn parse_score(input: &str) -> Result<(u32, u32), InputError> {
    let trimmed = input.trim();
    let malformed = || InputError::MalformedScore(trimmed.to_string());
    let (home, away) = trimmed.split_once('-').ok_or_else(malformed)?;
    let home_score = home.trim().parse().map_err(|_| malformed())?;
    let away_score = away.trim().parse().map_err(|_| malformed())?;
    Ok((home_score, away_score))
}

/// Parse a 0-based week index.
pub fn parse_week(input: &str) -> Result<usize, InputError> {
    input
        .trim()
        .parse()
        .map_err(|_| InputError::MalformedWeek(input.trim().to_string()))
}

/// Parse a season count for the aggregator; zero is rejected.
pub fn parse_season_count(input: &str) -> Result<usize, InputError> {
    let trimmed = input.trim();
    let count: usize = trimmed
        .parse()
        .map_err(|_| InputError::InvalidSeasonCount(trimmed.to_string()))?;
    if count == 0 {
        return Err(InputError::InvalidSeasonCount(trimmed.to_string()));
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub league: League,
    pub config: SimConfig,
    rng: ChaCha8Rng,
}

impl App {
    pub fn new(league: League, config: SimConfig, rng: ChaCha8Rng) -> Self {
        App {
            league,
            config,
            rng,
        }
    }

    /// Validate and apply a manual result entry. Returns `true` when the
    /// entry was the explicit 0-0 reset.
    pub fn apply_manual(
        &mut self,
        abbreviation: &str,
        week_input: &str,
        score_input: &str,
    ) -> Result<bool, InputError> {
        let abbreviation = abbreviation.trim();
        let team = self
            .league
            .team_by_abbreviation(abbreviation)
            .ok_or_else(|| InputError::UnknownTeam(abbreviation.to_string()))?;

        let week = parse_week(week_input)?;
        let id = self
            .league
            .schedule
            .game_at(team, week)
            .ok_or(InputError::WeekOutOfRange {
                week,
                weeks: self.league.schedule.num_weeks(),
            })?;

        let (home_score, away_score) = parse_score(score_input)?;
        results::apply_result(
            &mut self.league,
            id,
            home_score,
            away_score,
            true,
            self.config.elo.k_manual,
            &self.config,
        )?;
        Ok(home_score == 0 && away_score == 0)
    }

    /// The blocking command loop. EOF on stdin quits like `quit`.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            prompt("Enter command (quit, update, print, run, save): ")?;
            let Some(line) = next_line(&mut lines)? else {
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Update => self.handle_update(&mut lines)?,
                Command::Print => {
                    report::print_schedule(&self.league);
                    report::print_standings(&self.league);
                }
                Command::Run => self.handle_run(&mut lines)?,
                Command::Save => self.handle_save(&mut lines)?,
                Command::Unknown(other) => {
                    println!("Unknown command `{other}`. Please try again.");
                }
            }
        }

        info!("interactive session ended");
        Ok(())
    }

    fn handle_update(
        &mut self,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> anyhow::Result<()> {
        prompt("Enter team abbreviation: ")?;
        let Some(abbreviation) = next_line(lines)? else {
            return Ok(());
        };
        prompt("Enter game week (0-based index): ")?;
        let Some(week) = next_line(lines)? else {
            return Ok(());
        };
        prompt("Enter score (format: homeScore-awayScore): ")?;
        let Some(score) = next_line(lines)? else {
            return Ok(());
        };

        match self.apply_manual(&abbreviation, &week, &score) {
            Ok(true) => println!("Game reset."),
            Ok(false) => println!("Game and Elo updated."),
            Err(err) => println!("{err}"),
        }
        Ok(())
    }

    fn handle_run(
        &mut self,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> anyhow::Result<()> {
        prompt("Enter number of seasons to simulate: ")?;
        let Some(count_input) = next_line(lines)? else {
            return Ok(());
        };

        let count = match parse_season_count(&count_input) {
            Ok(count) => count,
            Err(err) => {
                println!("{err}");
                return Ok(());
            }
        };

        info!("running {count} season simulations");
        let summaries = aggregate::run_trials(&mut self.league, count, &mut self.rng, &self.config);
        report::print_summary(&self.league, &summaries, count);
        Ok(())
    }

    fn handle_save(
        &mut self,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> anyhow::Result<()> {
        prompt("Enter output path: ")?;
        let Some(path_input) = next_line(lines)? else {
            return Ok(());
        };
        let path_input = path_input.trim();
        if path_input.is_empty() {
            println!("No path given.");
            return Ok(());
        }

        match loader::save_schedule(&self.league, Path::new(path_input)) {
            Ok(()) => println!("Schedule written to {path_input}."),
            Err(err) => println!("{err}"),
        }
        Ok(())
    }
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}");
    io::stdout().flush()
}

fn next_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
