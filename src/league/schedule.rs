// The schedule store: a flat fixture arena plus per-team week rows.
//
// Every real pairing exists exactly once in `games`; both participants'
// rows hold the same `GameId`, so either team's view of a fixture reads
// and writes the identical state. Rows are indexed by `TeamId` and all
// have the same length (the number of weeks).

use crate::league::game::{Game, GameId};
use crate::league::team::TeamId;

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    games: Vec<Game>,
    rows: Vec<Vec<GameId>>,
}

impl Schedule {
    pub fn new() -> Self {
        Schedule::default()
    }

    pub fn num_teams(&self) -> usize {
        self.rows.len()
    }

    pub fn num_weeks(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn game(&self, id: GameId) -> &Game {
        &self.games[id]
    }

    pub fn game_mut(&mut self, id: GameId) -> &mut Game {
        &mut self.games[id]
    }

    /// All fixtures in arena (creation) order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game_ids(&self) -> std::ops::Range<GameId> {
        0..self.games.len()
    }

    /// A team's week row, in week order.
    pub fn row(&self, team: TeamId) -> &[GameId] {
        &self.rows[team]
    }

    pub fn game_at(&self, team: TeamId, week: usize) -> Option<GameId> {
        self.rows.get(team).and_then(|row| row.get(week)).copied()
    }

    pub(crate) fn insert_game(&mut self, game: Game) -> GameId {
        self.games.push(game);
        self.games.len() - 1
    }

    /// Install `row` as `team`'s week row. Rows are pre-sized empty at
    /// construction start so ids are valid immediately.
    pub(crate) fn set_row(&mut self, team: TeamId, row: Vec<GameId>) {
        self.rows[team] = row;
    }

    pub(crate) fn reserve_rows(&mut self, num_teams: usize) {
        self.rows = vec![Vec::new(); num_teams];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_ids_resolve_to_one_fixture() {
        let mut schedule = Schedule::new();
        schedule.reserve_rows(2);
        let id = schedule.insert_game(Game::scheduled(0, 1, 0));
        schedule.set_row(0, vec![id]);
        schedule.set_row(1, vec![id]);

        schedule.game_mut(id).home_score = 35;

        assert_eq!(schedule.game_at(0, 0), schedule.game_at(1, 0));
        let via_away = schedule.game(schedule.game_at(1, 0).unwrap());
        assert_eq!(via_away.home_score, 35);
    }

    #[test]
    fn lookups_track_row_materialization() {
        let mut schedule = Schedule::new();
        schedule.reserve_rows(2);
        assert_eq!(schedule.game_at(0, 0), None);

        let id = schedule.insert_game(Game::bye(0, 0));
        schedule.set_row(0, vec![id]);
        assert_eq!(schedule.game_at(0, 0), Some(id));
        assert_eq!(schedule.game_at(0, 1), None);
        assert_eq!(schedule.game_at(1, 0), None);
        assert_eq!(schedule.num_weeks(), 1);
        assert_eq!(schedule.num_teams(), 2);
    }
}
