// League state: the team registry, the conference/division structure, and
// the shared-fixture schedule, assembled from loaded CSV records.
//
// This module owns state only. The simulation engines under `crate::sim`
// are the writers of results and ratings; everything here either builds
// the initial state or answers queries about it.

pub mod game;
pub mod loader;
pub mod schedule;
pub mod team;

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::league::game::Game;
use crate::league::loader::{CellRecord, LoadError, ScheduleRowRecord, TeamRecord};
use crate::league::schedule::Schedule;
use crate::league::team::{City, Team, TeamId};

// ---------------------------------------------------------------------------
// Input validation errors
// ---------------------------------------------------------------------------

/// Errors for user-facing operations (manual result entry, run counts).
/// Every variant aborts the operation with no state mutated.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid score `{0}`, expected `homeScore-awayScore`")]
    MalformedScore(String),

    #[error("invalid week `{0}`, expected a 0-based week index")]
    MalformedWeek(String),

    #[error("unknown team abbreviation `{0}`")]
    UnknownTeam(String),

    #[error("week {week} out of range, schedule has {weeks} weeks")]
    WeekOutOfRange { week: usize, weeks: usize },

    #[error("week {0} is a bye week, there is no result to enter")]
    ByeWeekResult(usize),

    #[error("invalid season count `{0}`")]
    InvalidSeasonCount(String),
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// Conference name → division name → teams in file order.
pub type LeagueStructure = BTreeMap<String, BTreeMap<String, Vec<TeamId>>>;

#[derive(Debug, Clone)]
pub struct League {
    /// Teams indexed by `TeamId`.
    pub teams: Vec<Team>,
    pub structure: LeagueStructure,
    pub schedule: Schedule,
    by_abbreviation: HashMap<String, TeamId>,
}

impl League {
    /// Assemble a league from loaded team and schedule records.
    ///
    /// Builds the registry and conference structure, then materializes the
    /// schedule row by row. Each matchup cell is deduplicated against the
    /// opposing team's already-materialized row: if the opponent's row
    /// covers the week it already owns the shared fixture, otherwise a new
    /// one enters the arena. Completed cells carry their scores and are
    /// flagged `user_set`; rating and win-count effects are applied later
    /// by the result processor's replay.
    pub fn from_records(
        team_records: Vec<TeamRecord>,
        schedule_rows: Vec<ScheduleRowRecord>,
    ) -> Result<League, LoadError> {
        let mut teams = Vec::with_capacity(team_records.len());
        let mut by_abbreviation = HashMap::new();
        let mut structure: LeagueStructure = BTreeMap::new();

        for (id, rec) in team_records.into_iter().enumerate() {
            if by_abbreviation.insert(rec.abbreviation.clone(), id).is_some() {
                return Err(LoadError::DuplicateAbbreviation(rec.abbreviation));
            }
            structure
                .entry(rec.conference.clone())
                .or_default()
                .entry(rec.division.clone())
                .or_default()
                .push(id);
            teams.push(Team::new(
                id,
                rec.name,
                rec.abbreviation,
                rec.color,
                rec.elo,
                City::new(rec.city, rec.latitude, rec.longitude),
            ));
        }

        let by_name: HashMap<String, TeamId> =
            teams.iter().map(|t| (t.name.clone(), t.id)).collect();

        let mut schedule = Schedule::new();
        schedule.reserve_rows(teams.len());

        let expected_weeks = schedule_rows.first().map(|r| r.cells.len()).unwrap_or(0);
        let mut seen_rows = vec![false; teams.len()];

        for row_rec in &schedule_rows {
            let team_id = *by_name
                .get(&row_rec.team_name)
                .ok_or_else(|| LoadError::UnknownScheduleTeam(row_rec.team_name.clone()))?;
            if seen_rows[team_id] {
                return Err(LoadError::Validation(format!(
                    "duplicate schedule row for `{}`",
                    row_rec.team_name
                )));
            }
            seen_rows[team_id] = true;
            if row_rec.cells.len() != expected_weeks {
                return Err(LoadError::RaggedSchedule {
                    team: row_rec.team_name.clone(),
                    expected: expected_weeks,
                    found: row_rec.cells.len(),
                });
            }

            let mut row = Vec::with_capacity(expected_weeks);
            for (week, cell) in row_rec.cells.iter().enumerate() {
                let game_id = match cell {
                    CellRecord::Bye => schedule.insert_game(Game::bye(team_id, week)),
                    CellRecord::Matchup {
                        opponent,
                        row_team_away,
                        complete,
                        home_score,
                        away_score,
                    } => {
                        let opponent_id = *by_abbreviation.get(opponent).ok_or_else(|| {
                            LoadError::UnknownOpponent {
                                team: row_rec.team_name.clone(),
                                week,
                                opponent: opponent.clone(),
                            }
                        })?;
                        let (home, away) = if *row_team_away {
                            (opponent_id, team_id)
                        } else {
                            (team_id, opponent_id)
                        };

                        // The opponent's row, if already materialized, owns
                        // the shared fixture for this week.
                        if let Some(existing_id) = schedule.game_at(opponent_id, week) {
                            let existing = schedule.game(existing_id);
                            if existing.is_bye || existing.home != home || existing.away != away
                            {
                                return Err(LoadError::MismatchedFixture {
                                    team: row_rec.team_name.clone(),
                                    opponent: opponent.clone(),
                                    week,
                                });
                            }
                            existing_id
                        } else {
                            let mut game = Game::scheduled(home, away, week);
                            let decided = *complete && (*home_score != 0 || *away_score != 0);
                            if *complete && !decided {
                                warn!(
                                    "completed 0-0 cell for `{}` week {} loaded as not played",
                                    row_rec.team_name, week
                                );
                            }
                            if decided {
                                game.home_score = *home_score;
                                game.away_score = *away_score;
                                game.is_complete = true;
                                game.user_set = true;
                            }
                            schedule.insert_game(game)
                        }
                    }
                };
                row.push(game_id);
            }
            schedule.set_row(team_id, row);
        }

        for (id, seen) in seen_rows.iter().enumerate() {
            if !seen {
                return Err(LoadError::MissingScheduleRow(teams[id].name.clone()));
            }
        }

        Ok(League {
            teams,
            structure,
            schedule,
            by_abbreviation,
        })
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id]
    }

    pub fn team_mut(&mut self, id: TeamId) -> &mut Team {
        &mut self.teams[id]
    }

    pub fn team_by_abbreviation(&self, abbreviation: &str) -> Option<TeamId> {
        self.by_abbreviation.get(abbreviation).copied()
    }

    /// All teams of one conference, in division order.
    pub fn conference_teams(&self, conference: &str) -> Vec<TeamId> {
        self.structure
            .get(conference)
            .map(|divisions| divisions.values().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Disjoint mutable borrows of the team registry and the schedule, for
    /// the result processor which writes both.
    pub fn parts_mut(&mut self) -> (&mut [Team], &mut Schedule) {
        (&mut self.teams, &mut self.schedule)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
