// Pregame odds: rest-adjusted Elo difference plus a geography-derived
// field advantage, mapped through the standard Elo logistic.
//
// Field advantage is distance-based and immutable for a pairing, so it is
// computed once per fixture and cached there. Probabilities go stale as
// soon as either participant's rating moves; the result processor calls
// the refresh entry points here after every applied result.

use crate::config::OddsConfig;
use crate::league::game::{Game, GameId};
use crate::league::team::{City, TeamId};
use crate::league::League;

/// Elo logistic spread: a 400-point gap is 10:1 odds.
pub const ELO_LOGISTIC_DIVISOR: f64 = 400.0;

const EARTH_RADIUS_METERS: f64 = 6_378_137.0;
const METERS_PER_MILE: f64 = 1_609.34;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Great-circle distance between two cities in miles (haversine).
pub fn haversine_miles(a: &City, b: &City) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let central = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * central / METERS_PER_MILE
}

/// Home edge in Elo points: a flat home-field base plus a travel penalty
/// on the away side per 1,000 miles flown.
pub fn field_advantage(config: &OddsConfig, home: &City, away: &City) -> f64 {
    haversine_miles(home, away) / 1000.0 * config.travel_points_per_1000_miles
        + config.home_field_base
}

/// P(home wins) from an Elo-point difference.
pub fn home_win_probability(elo_diff: f64) -> f64 {
    1.0 / (1.0 + (-elo_diff / ELO_LOGISTIC_DIVISOR).exp())
}

fn coming_off_bye(league: &League, team: TeamId, week: usize) -> bool {
    week > 0
        && league
            .schedule
            .game_at(team, week - 1)
            .map(|id| league.schedule.game(id).is_bye)
            .unwrap_or(false)
}

/// Rest hook, in Elo points from the home side: +bonus when the home team
/// is coming off a bye, -bonus when the away team is. Ephemeral playoff
/// fixtures hold no schedule slot and never qualify.
pub fn rest_adjustment(league: &League, game: &Game, config: &OddsConfig) -> f64 {
    let Some(week) = game.week else {
        return 0.0;
    };
    let mut adjustment = 0.0;
    if coming_off_bye(league, game.home, week) {
        adjustment += config.rest_bonus;
    }
    if coming_off_bye(league, game.away, week) {
        adjustment -= config.rest_bonus;
    }
    adjustment
}

/// Probability and (cached-or-fresh) field advantage for a non-bye game.
fn computed_odds(league: &League, game: &Game, config: &OddsConfig) -> (f64, f64) {
    let home = league.team(game.home);
    let away = league.team(game.away);

    let advantage = game
        .field_advantage
        .unwrap_or_else(|| field_advantage(config, &home.city, &away.city));

    let elo_diff = home.elo - away.elo + rest_adjustment(league, game, config) + advantage;
    (home_win_probability(elo_diff), advantage)
}

// ---------------------------------------------------------------------------
// Refresh entry points
// ---------------------------------------------------------------------------

/// Recompute the stored probability of one arena fixture. No-op for byes.
pub fn refresh_game(league: &mut League, id: GameId, config: &OddsConfig) {
    let (probability, advantage) = {
        let game = league.schedule.game(id);
        if game.is_bye {
            return;
        }
        computed_odds(league, game, config)
    };
    let game = league.schedule.game_mut(id);
    game.home_win_probability = probability;
    game.field_advantage = Some(advantage);
}

/// Recompute every incomplete fixture on a team's row, after its rating
/// moved.
pub fn refresh_team(league: &mut League, team: TeamId, config: &OddsConfig) {
    for week in 0..league.schedule.num_weeks() {
        let Some(id) = league.schedule.game_at(team, week) else {
            continue;
        };
        if league.schedule.game(id).is_complete {
            continue;
        }
        refresh_game(league, id, config);
    }
}

/// Recompute every incomplete fixture in the schedule (initial load and
/// per-trial reset).
pub fn refresh_all(league: &mut League, config: &OddsConfig) {
    for id in league.schedule.game_ids() {
        if league.schedule.game(id).is_complete {
            continue;
        }
        refresh_game(league, id, config);
    }
}

/// Odds for an ephemeral playoff fixture (lives outside the arena).
pub fn refresh_ephemeral(league: &League, game: &mut Game, config: &OddsConfig) {
    if game.is_bye {
        return;
    }
    let (probability, advantage) = computed_odds(league, game, config);
    game.home_win_probability = probability;
    game.field_advantage = Some(advantage);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
