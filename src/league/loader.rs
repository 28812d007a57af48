// Team and schedule data loading.
//
// Both files are CSV with a header row. The team file is deserialized by
// column name (a few aliases accepted); the schedule file is positional:
// one row per team, a team-name column followed by one cell per week in
// the `OPP#Y/N#homeScore#awayScore` grammar (`@` prefix = the row team is
// the away side, literal `BYE` = no opponent).
//
// Loading is fallible end to end: a missing file, a malformed row, or an
// inconsistent cell is a hard error, never a silently-empty league.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::league::League;

// ---------------------------------------------------------------------------
// Public record types
// ---------------------------------------------------------------------------

/// One row of the team file, before registry construction.
#[derive(Debug, Clone)]
pub struct TeamRecord {
    pub name: String,
    pub abbreviation: String,
    pub color: String,
    pub elo: f64,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub conference: String,
    pub division: String,
}

/// One parsed week cell of a schedule row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellRecord {
    Bye,
    Matchup {
        /// Opponent abbreviation, `@` prefix already stripped.
        opponent: String,
        /// True when the row's own team is the away side.
        row_team_away: bool,
        complete: bool,
        home_score: u32,
        away_score: u32,
    },
}

/// One row of the schedule file: a team and its week cells in order.
#[derive(Debug, Clone)]
pub struct ScheduleRowRecord {
    pub team_name: String,
    pub cells: Vec<CellRecord>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("duplicate team abbreviation `{0}`")]
    DuplicateAbbreviation(String),

    #[error("schedule references unknown team name `{0}`")]
    UnknownScheduleTeam(String),

    #[error("missing schedule row for team `{0}`")]
    MissingScheduleRow(String),

    #[error("schedule row for `{team}` has {found} week cells, expected {expected}")]
    RaggedSchedule {
        team: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed schedule cell `{cell}` for `{team}` week {week}")]
    MalformedCell {
        team: String,
        week: usize,
        cell: String,
    },

    #[error("unknown opponent abbreviation `{opponent}` for `{team}` week {week}")]
    UnknownOpponent {
        team: String,
        week: usize,
        opponent: String,
    },

    #[error("`{team}` and `{opponent}` disagree about the week {week} fixture")]
    MismatchedFixture {
        team: String,
        opponent: String,
        week: usize,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Team file row. Extra columns are absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawTeamRow {
    #[serde(alias = "Name", alias = "Team", alias = "team")]
    name: String,
    #[serde(alias = "Abbreviation", alias = "abbr", alias = "Abbr")]
    abbreviation: String,
    #[serde(alias = "Color")]
    color: String,
    #[serde(alias = "Elo", alias = "baseline_elo", alias = "ELO")]
    elo: f64,
    #[serde(alias = "City")]
    city: String,
    #[serde(alias = "Latitude", alias = "lat")]
    latitude: f64,
    #[serde(alias = "Longitude", alias = "lon")]
    longitude: f64,
    #[serde(alias = "Conference")]
    conference: String,
    #[serde(alias = "Division")]
    division: String,
    /// Absorb any extra columns.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (public, enable testing without temp files)
// ---------------------------------------------------------------------------

/// Load team records from CSV text.
pub fn load_teams_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut teams = Vec::new();
    for result in reader.deserialize::<RawTeamRow>() {
        let raw = result?;
        let name = raw.name.trim().to_string();
        if !raw.elo.is_finite() || !raw.latitude.is_finite() || !raw.longitude.is_finite() {
            return Err(LoadError::Validation(format!(
                "non-finite numeric field for team `{name}`"
            )));
        }
        teams.push(TeamRecord {
            name,
            abbreviation: raw.abbreviation.trim().to_string(),
            color: raw.color.trim().to_string(),
            elo: raw.elo,
            city: raw.city.trim().to_string(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            conference: raw.conference.trim().to_string(),
            division: raw.division.trim().to_string(),
        });
    }
    if teams.is_empty() {
        return Err(LoadError::Validation(
            "team CSV produced zero rows".into(),
        ));
    }
    Ok(teams)
}

/// Load schedule rows from CSV text. Cell grammar is validated here; team
/// and opponent names are resolved later, during league construction.
pub fn load_schedule_from_reader<R: Read>(rdr: R) -> Result<Vec<ScheduleRowRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut fields = record.iter();
        let team_name = match fields.next() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => {
                return Err(LoadError::Validation(
                    "schedule row with empty team name".into(),
                ))
            }
        };
        let mut cells = Vec::new();
        for (week, cell) in fields.enumerate() {
            cells.push(parse_cell(&team_name, week, cell.trim())?);
        }
        rows.push(ScheduleRowRecord { team_name, cells });
    }
    if rows.is_empty() {
        return Err(LoadError::Validation(
            "schedule CSV produced zero rows".into(),
        ));
    }
    Ok(rows)
}

/// Parse one week cell: `BYE` or `OPP#Y/N#homeScore#awayScore`.
///
/// `BYE#...` is accepted too, for round-tripping files written by older
/// exporters that padded bye cells out to four fields.
fn parse_cell(team: &str, week: usize, cell: &str) -> Result<CellRecord, LoadError> {
    let malformed = || LoadError::MalformedCell {
        team: team.to_string(),
        week,
        cell: cell.to_string(),
    };

    if cell == "BYE" || cell.starts_with("BYE#") {
        return Ok(CellRecord::Bye);
    }

    let parts: Vec<&str> = cell.split('#').collect();
    if parts.len() != 4 {
        return Err(malformed());
    }

    let (mut opponent, complete_flag) = (parts[0], parts[1]);
    let row_team_away = opponent.starts_with('@');
    if row_team_away {
        opponent = &opponent[1..];
    }
    if opponent.is_empty() {
        return Err(malformed());
    }

    let complete = match complete_flag {
        "Y" => true,
        "N" => false,
        _ => return Err(malformed()),
    };
    let home_score: u32 = parts[2].parse().map_err(|_| malformed())?;
    let away_score: u32 = parts[3].parse().map_err(|_| malformed())?;

    Ok(CellRecord::Matchup {
        opponent: opponent.to_string(),
        row_team_away,
        complete,
        home_score,
        away_score,
    })
}

// ---------------------------------------------------------------------------
// Path-based loaders
// ---------------------------------------------------------------------------

/// Load the team file from disk.
pub fn load_teams(path: &Path) -> Result<Vec<TeamRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_teams_from_reader(file)
}

/// Load the schedule file from disk.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduleRowRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_schedule_from_reader(file)
}

// ---------------------------------------------------------------------------
// Schedule export
// ---------------------------------------------------------------------------

/// Write the league's current schedule state in the input cell format, one
/// row per team, so a partially played season can be re-ingested later.
pub fn write_schedule<W: Write>(league: &League, mut w: W) -> Result<(), std::io::Error> {
    let weeks = league.schedule.num_weeks();
    let header: Vec<String> = std::iter::once("Team".to_string())
        .chain((1..=weeks).map(|n| format!("Week {n}")))
        .collect();
    writeln!(w, "{}", header.join(","))?;

    for team in &league.teams {
        let mut fields = vec![team.name.clone()];
        for &game_id in league.schedule.row(team.id) {
            let game = league.schedule.game(game_id);
            let opponent = league.team(game.opponent_of(team.id));
            fields.push(game.csv_cell_for(team, opponent));
        }
        writeln!(w, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Write the schedule to a file on disk.
pub fn save_schedule(league: &League, path: &Path) -> Result<(), LoadError> {
    let file = std::fs::File::create(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_schedule(league, file).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
