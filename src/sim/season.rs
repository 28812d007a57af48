// Season driving: play out every unplayed fixture in schedule order, then
// resolve the postseason. Also owns the mandatory between-trials reset
// that makes Monte Carlo trials independent samples from the same
// preseason prior.

use rand::Rng;
use tracing::debug;

use crate::config::SimConfig;
use crate::league::team::TeamId;
use crate::league::League;
use crate::sim::{outcome, playoffs, results};

/// Simulate every incomplete regular-season fixture, walking each team's
/// row in week order. Shared fixtures complete on first encounter and are
/// skipped from the partner row; each result refreshes both participants'
/// remaining odds before the next draw.
pub fn simulate_regular_season(league: &mut League, rng: &mut impl Rng, config: &SimConfig) {
    for team in 0..league.num_teams() {
        for week in 0..league.schedule.num_weeks() {
            let Some(id) = league.schedule.game_at(team, week) else {
                continue;
            };
            outcome::simulate_game(league, id, rng, config);
        }
    }
}

/// Drive one full season: regular season, then seeding and the playoff
/// bracket. Returns the champion, or `None` when the league's shape
/// cannot field the full bracket.
pub fn simulate_season(
    league: &mut League,
    rng: &mut impl Rng,
    config: &SimConfig,
) -> Option<TeamId> {
    simulate_regular_season(league, rng, config);
    match playoffs::seed_conferences(league, rng) {
        Some(seeding) => playoffs::simulate_playoffs(league, &seeding, rng, config),
        None => {
            debug!("league cannot field a full playoff bracket; skipping postseason");
            None
        }
    }
}

/// Restore the preseason prior before a trial: teams back to baseline,
/// simulated results cleared, externally-supplied (`user_set`) results
/// kept and replayed through the result processor, odds refreshed.
pub fn reset_for_trial(league: &mut League, config: &SimConfig) {
    for team in &mut league.teams {
        team.reset();
    }
    for id in league.schedule.game_ids() {
        let game = league.schedule.game_mut(id);
        if game.is_bye {
            continue;
        }
        if game.user_set && game.is_complete {
            game.applied_elo_delta = 0.0;
        } else {
            game.reset_result();
        }
    }
    results::replay_user_results(league, config);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::loader::{CellRecord, ScheduleRowRecord, TeamRecord};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn record(name: &str, abbr: &str) -> TeamRecord {
        TeamRecord {
            name: name.to_string(),
            abbreviation: abbr.to_string(),
            color: "grey".to_string(),
            elo: 1500.0,
            city: format!("{name} City"),
            latitude: 40.0,
            longitude: -80.0,
            conference: "East".to_string(),
            division: "North".to_string(),
        }
    }

    fn matchup(opponent: &str, away: bool) -> CellRecord {
        CellRecord::Matchup {
            opponent: opponent.to_string(),
            row_team_away: away,
            complete: false,
            home_score: 0,
            away_score: 0,
        }
    }

    fn row(name: &str, cells: Vec<CellRecord>) -> ScheduleRowRecord {
        ScheduleRowRecord {
            team_name: name.to_string(),
            cells,
        }
    }

    fn two_team_league() -> League {
        League::from_records(
            vec![record("Alpha", "AAA"), record("Beta", "BBB")],
            vec![
                row(
                    "Alpha",
                    vec![
                        matchup("BBB", false),
                        CellRecord::Bye,
                        matchup("BBB", true),
                    ],
                ),
                row(
                    "Beta",
                    vec![matchup("AAA", true), CellRecord::Bye, matchup("AAA", false)],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn regular_season_completes_every_fixture() {
        let mut league = two_team_league();
        let config = SimConfig::default();
        results::replay_user_results(&mut league, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        simulate_regular_season(&mut league, &mut rng, &config);

        assert!(league.schedule.games().iter().all(|g| g.is_complete));
        // Two decisive-or-tied games' worth of credit was handed out.
        let total_wins = league.team(0).wins + league.team(1).wins;
        assert_relative_eq!(total_wins, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn trial_reset_keeps_user_results_and_drops_simulated_ones() {
        let mut league = two_team_league();
        let config = SimConfig::default();
        results::replay_user_results(&mut league, &config);

        // Manually entered week-0 result, then a simulated finish.
        let week0 = league.schedule.game_at(0, 0).unwrap();
        results::apply_result(&mut league, week0, 28, 3, true, config.elo.k_manual, &config)
            .unwrap();
        let elo_after_manual = league.team(0).elo;

        let mut rng = ChaCha8Rng::seed_from_u64(10);
        simulate_regular_season(&mut league, &mut rng, &config);

        reset_for_trial(&mut league, &config);

        let manual = league.schedule.game(week0);
        assert!(manual.is_complete && manual.user_set);
        assert_eq!((manual.home_score, manual.away_score), (28, 3));

        let week2 = league.schedule.game_at(0, 2).unwrap();
        assert!(!league.schedule.game(week2).is_complete);

        // Exactly the manual result is baked into the restored state.
        assert_relative_eq!(league.team(0).elo, elo_after_manual, epsilon = 1e-9);
        assert_eq!(league.team(0).wins, 1.0);
        assert_eq!(league.team(1).wins, 0.0);
        assert_eq!(league.team(1).losses[&0], 25);
    }

    #[test]
    fn season_without_bracket_shape_still_finishes() {
        let mut league = two_team_league();
        let config = SimConfig::default();
        results::replay_user_results(&mut league, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let champion = simulate_season(&mut league, &mut rng, &config);
        assert!(champion.is_none());
        assert!(league.schedule.games().iter().all(|g| g.is_complete));
    }
}
