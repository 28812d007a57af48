// Fixtures: one scheduled matchup per team pair per week, plus the
// ephemeral games played during a simulated playoff bracket.
//
// A scheduled fixture lives once in the schedule arena and is referenced
// from both participants' rows, so score/completion/probability state has a
// single source of truth. A bye is the sentinel pairing home == away:
// always complete, 0-0, excluded from odds and Elo processing.

use crate::league::team::{Team, TeamId};

/// Index into the schedule's fixture arena.
pub type GameId = usize;

#[derive(Debug, Clone)]
pub struct Game {
    pub home: TeamId,
    pub away: TeamId,
    /// Week slot in the regular-season schedule; `None` for ephemeral
    /// playoff games, which never occupy a slot.
    pub week: Option<usize>,
    pub is_bye: bool,
    pub is_complete: bool,
    pub home_score: u32,
    pub away_score: u32,
    pub home_win_probability: f64,
    /// Geography-derived home edge in Elo points. `None` until first
    /// computed; never recomputed afterwards.
    pub field_advantage: Option<f64>,
    /// Home-side Elo delta applied for this result, kept for reversal on
    /// re-entry. Zero while incomplete.
    pub applied_elo_delta: f64,
    /// Externally-supplied result (CSV-loaded or manually entered);
    /// preserved across Monte Carlo trial resets.
    pub user_set: bool,
}

impl Game {
    /// A regular scheduled matchup, not yet played.
    pub fn scheduled(home: TeamId, away: TeamId, week: usize) -> Self {
        Game {
            home,
            away,
            week: Some(week),
            is_bye: false,
            is_complete: false,
            home_score: 0,
            away_score: 0,
            home_win_probability: 0.0,
            field_advantage: None,
            applied_elo_delta: 0.0,
            user_set: false,
        }
    }

    /// A bye slot for `team`: the sentinel self-pairing, complete at 0-0.
    pub fn bye(team: TeamId, week: usize) -> Self {
        Game {
            home: team,
            away: team,
            week: Some(week),
            is_bye: true,
            is_complete: true,
            home_score: 0,
            away_score: 0,
            home_win_probability: 0.0,
            field_advantage: None,
            applied_elo_delta: 0.0,
            user_set: false,
        }
    }

    /// An ephemeral playoff matchup. Never inserted into the arena.
    pub fn playoff(home: TeamId, away: TeamId) -> Self {
        Game {
            home,
            away,
            week: None,
            is_bye: false,
            is_complete: false,
            home_score: 0,
            away_score: 0,
            home_win_probability: 0.0,
            field_advantage: None,
            applied_elo_delta: 0.0,
            user_set: false,
        }
    }

    /// The other participant, from `team`'s point of view.
    pub fn opponent_of(&self, team: TeamId) -> TeamId {
        if self.home == team {
            self.away
        } else {
            self.home
        }
    }

    pub fn is_home(&self, team: TeamId) -> bool {
        self.home == team
    }

    /// Winner by score, `None` on a tie or while incomplete.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_complete || self.is_bye || self.home_score == self.away_score {
            return None;
        }
        if self.home_score > self.away_score {
            Some(self.home)
        } else {
            Some(self.away)
        }
    }

    /// Clear any result: scores, completion, delta, and the user flag.
    /// Byes stay complete. The cached field advantage is kept.
    pub fn reset_result(&mut self) {
        self.home_score = 0;
        self.away_score = 0;
        self.is_complete = self.is_bye;
        self.applied_elo_delta = 0.0;
        self.user_set = false;
    }

    /// One-line rendering from `perspective`'s side of the fixture:
    /// opponent, scores in own-first order, and own win probability.
    pub fn describe_for(&self, perspective: &Team, opponent: &Team) -> String {
        if self.is_bye {
            return "BYE".to_string();
        }
        if self.is_home(perspective.id) {
            format!(
                "{}|{}-{}|{:.1}%",
                opponent.abbreviation,
                self.home_score,
                self.away_score,
                self.home_win_probability * 100.0
            )
        } else {
            format!(
                "@{}|{}-{}|{:.1}%",
                opponent.abbreviation,
                self.away_score,
                self.home_score,
                (1.0 - self.home_win_probability) * 100.0
            )
        }
    }

    /// Schedule-file cell for this fixture from `perspective`'s row:
    /// `OPP#Y/N#homeScore#awayScore`, `@`-prefixed when the row team is
    /// the away side, or the literal `BYE`.
    pub fn csv_cell_for(&self, perspective: &Team, opponent: &Team) -> String {
        if self.is_bye {
            return "BYE".to_string();
        }
        let opponent_field = if self.is_home(perspective.id) {
            opponent.abbreviation.clone()
        } else {
            format!("@{}", opponent.abbreviation)
        };
        format!(
            "{}#{}#{}#{}",
            opponent_field,
            if self.is_complete { "Y" } else { "N" },
            self.home_score,
            self.away_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::team::City;

    fn team(id: TeamId, abbr: &str) -> Team {
        Team::new(
            id,
            format!("Team {abbr}"),
            abbr,
            "grey",
            1500.0,
            City::new("Nowhere", 0.0, 0.0),
        )
    }

    #[test]
    fn bye_is_self_paired_and_complete() {
        let g = Game::bye(4, 7);
        assert!(g.is_bye);
        assert!(g.is_complete);
        assert_eq!(g.home, g.away);
        assert_eq!((g.home_score, g.away_score), (0, 0));
    }

    #[test]
    fn reset_keeps_field_advantage_cache() {
        let mut g = Game::scheduled(0, 1, 3);
        g.field_advantage = Some(52.0);
        g.home_score = 21;
        g.away_score = 17;
        g.is_complete = true;
        g.applied_elo_delta = 3.4;
        g.user_set = true;

        g.reset_result();

        assert!(!g.is_complete);
        assert_eq!((g.home_score, g.away_score), (0, 0));
        assert_eq!(g.applied_elo_delta, 0.0);
        assert!(!g.user_set);
        assert_eq!(g.field_advantage, Some(52.0));
    }

    #[test]
    fn describe_flips_perspective() {
        let home = team(0, "AAA");
        let away = team(1, "BBB");
        let mut g = Game::scheduled(0, 1, 0);
        g.home_score = 24;
        g.away_score = 10;
        g.home_win_probability = 0.75;

        assert_eq!(g.describe_for(&home, &away), "BBB|24-10|75.0%");
        assert_eq!(g.describe_for(&away, &home), "@AAA|10-24|25.0%");
    }

    #[test]
    fn csv_cell_round_trip_shape() {
        let home = team(0, "AAA");
        let away = team(1, "BBB");
        let mut g = Game::scheduled(0, 1, 0);
        g.home_score = 31;
        g.away_score = 28;
        g.is_complete = true;

        assert_eq!(g.csv_cell_for(&home, &away), "BBB#Y#31#28");
        assert_eq!(g.csv_cell_for(&away, &home), "@AAA#Y#31#28");
        assert_eq!(Game::bye(0, 1).csv_cell_for(&home, &home), "BYE");
    }

    #[test]
    fn winner_is_none_for_ties_and_unplayed() {
        let mut g = Game::scheduled(0, 1, 0);
        assert_eq!(g.winner(), None);
        g.home_score = 14;
        g.away_score = 14;
        g.is_complete = true;
        assert_eq!(g.winner(), None);
        g.away_score = 20;
        assert_eq!(g.winner(), Some(1));
    }
}
