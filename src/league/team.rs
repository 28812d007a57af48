// Team entities: identity, rating state, and season bookkeeping.
//
// Teams are addressed everywhere by `TeamId` (their dense load-order index,
// which doubles as the schedule row position). The loss ledger is keyed by
// `TeamId` as well, so tiebreak lookups never depend on object identity.

use std::collections::HashMap;

/// Stable dense team index; also the team's schedule row position.
pub type TeamId = usize;

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// Home city of a team. Immutable after load; drives field-advantage
/// distance calculations.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        City {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Playoff rounds
// ---------------------------------------------------------------------------

/// Furthest stage a team reached in the postseason. Ordered so that
/// "reached at least round X" is a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlayoffRound {
    /// Did not make the playoff field.
    Out,
    /// Made the 7-team conference field.
    WildCard,
    /// Survived the wildcard round (the bye seed starts here).
    Divisional,
    /// Reached the conference championship game.
    ConferenceChampionship,
    /// Won the conference; played in the championship game.
    SuperBowl,
    /// Won the championship game.
    Champion,
}

impl PlayoffRound {
    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PlayoffRound::Out => "-",
            PlayoffRound::WildCard => "Wild Card",
            PlayoffRound::Divisional => "Divisional",
            PlayoffRound::ConferenceChampionship => "Conference",
            PlayoffRound::SuperBowl => "Super Bowl",
            PlayoffRound::Champion => "Champion",
        }
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A single franchise and its mutable season state.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub color: String,
    pub city: City,
    /// Current rating; moves with every decisive result.
    pub elo: f64,
    /// Preseason rating; the reset target between Monte Carlo trials.
    pub baseline_elo: f64,
    /// Fractional win count; ties add 0.5.
    pub wins: f64,
    /// True only for teams seeded into the current playoff field.
    pub in_playoffs: bool,
    pub playoff_round: PlayoffRound,
    /// Most recent losing margin against each opponent, at most one entry
    /// per opponent (overwritten on every new loss to them). Read only by
    /// the division tiebreaker.
    pub losses: HashMap<TeamId, u32>,
}

impl Team {
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        color: impl Into<String>,
        baseline_elo: f64,
        city: City,
    ) -> Self {
        Team {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            color: color.into(),
            city,
            elo: baseline_elo,
            baseline_elo,
            wins: 0.0,
            in_playoffs: false,
            playoff_round: PlayoffRound::Out,
            losses: HashMap::new(),
        }
    }

    /// Restore the preseason state: baseline rating, zero wins, empty
    /// ledger, no playoff standing.
    pub fn reset(&mut self) {
        self.elo = self.baseline_elo;
        self.wins = 0.0;
        self.in_playoffs = false;
        self.playoff_round = PlayoffRound::Out;
        self.losses.clear();
    }

    /// Record a loss to `opponent` by `margin` points, overwriting any
    /// earlier entry for the same opponent.
    pub fn record_loss(&mut self, opponent: TeamId, margin: u32) {
        self.losses.insert(opponent, margin);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_team() -> Team {
        Team::new(
            0,
            "Testville Turbines",
            "TVT",
            "teal",
            1500.0,
            City::new("Testville", 40.0, -75.0),
        )
    }

    #[test]
    fn reset_restores_preseason_state() {
        let mut team = make_team();
        team.elo = 1623.5;
        team.wins = 9.5;
        team.in_playoffs = true;
        team.playoff_round = PlayoffRound::Divisional;
        team.record_loss(3, 14);

        team.reset();

        assert_eq!(team.elo, 1500.0);
        assert_eq!(team.wins, 0.0);
        assert!(!team.in_playoffs);
        assert_eq!(team.playoff_round, PlayoffRound::Out);
        assert!(team.losses.is_empty());
    }

    #[test]
    fn loss_ledger_keeps_only_latest_margin() {
        let mut team = make_team();
        team.record_loss(7, 21);
        team.record_loss(7, 3);

        assert_eq!(team.losses.len(), 1);
        assert_eq!(team.losses[&7], 3);
    }

    #[test]
    fn playoff_rounds_are_ordered() {
        assert!(PlayoffRound::Champion > PlayoffRound::SuperBowl);
        assert!(PlayoffRound::WildCard > PlayoffRound::Out);
        assert!(PlayoffRound::Divisional >= PlayoffRound::Divisional);
    }
}
