// The game result processor: the sole writer of fixture scores, completion
// state, applied Elo deltas, and of team ratings, win counts, and the loss
// ledger. Every other component only reads that state.
//
// Re-entry is idempotent: applying a result to an already-complete fixture
// first undoes the prior Elo delta and win credit, so a correction leaves
// the league exactly as if only the final result had ever been entered.
// A 0-0 submission is an explicit reset back to "not played".

use crate::config::{EloConfig, SimConfig};
use crate::league::game::{Game, GameId};
use crate::league::team::Team;
use crate::league::{InputError, League};
use crate::sim::odds;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Apply a result to a scheduled fixture and propagate its effects:
/// rating update, win credit, loss-ledger entry, and an odds refresh for
/// both participants' remaining fixtures.
///
/// `k` is the Elo K-factor for this application (`k_sim` for simulated
/// play, `k_manual` for corrections and file-supplied results).
pub fn apply_result(
    league: &mut League,
    id: GameId,
    home_score: u32,
    away_score: u32,
    user_set: bool,
    k: f64,
    config: &SimConfig,
) -> Result<(), InputError> {
    {
        let game = league.schedule.game(id);
        if game.is_bye {
            return Err(InputError::ByeWeekResult(game.week.unwrap_or(0)));
        }
    }
    apply_unchecked(league, id, home_score, away_score, user_set, k, config);
    Ok(())
}

/// The validated application path; callers guarantee `id` is not a bye.
pub(crate) fn apply_unchecked(
    league: &mut League,
    id: GameId,
    home_score: u32,
    away_score: u32,
    user_set: bool,
    k: f64,
    config: &SimConfig,
) {
    let (home, away) = {
        let game = league.schedule.game(id);
        (game.home, game.away)
    };

    // Undo any prior result first so re-entry and corrections are
    // idempotent for ratings and win counts alike.
    if league.schedule.game(id).is_complete {
        let (teams, schedule) = league.parts_mut();
        undo_completed(teams, schedule.game_mut(id));
    }

    if home_score == 0 && away_score == 0 {
        league.schedule.game_mut(id).reset_result();
    } else {
        {
            let game = league.schedule.game_mut(id);
            game.home_score = home_score;
            game.away_score = away_score;
            game.is_complete = true;
            game.user_set = user_set;
        }
        let (teams, schedule) = league.parts_mut();
        let game = schedule.game_mut(id);
        update_elo(teams, game, k, &config.elo);
        credit_result(teams, game);
    }

    odds::refresh_team(league, home, &config.odds);
    odds::refresh_team(league, away, &config.odds);
}

/// Re-apply every externally-supplied (`user_set`) completed result, in
/// fixture creation order. Used after the initial load and after each
/// Monte Carlo trial reset, when teams sit at baseline and all deltas are
/// zero. Finishes with a full odds refresh.
pub fn replay_user_results(league: &mut League, config: &SimConfig) {
    for id in league.schedule.game_ids() {
        {
            let game = league.schedule.game(id);
            if game.is_bye || !game.is_complete || !game.user_set {
                continue;
            }
        }
        let (teams, schedule) = league.parts_mut();
        let game = schedule.game_mut(id);
        update_elo(teams, game, config.elo.k_manual, &config.elo);
        credit_result(teams, game);
    }
    odds::refresh_all(league, &config.odds);
}

// ---------------------------------------------------------------------------
// Rating update
// ---------------------------------------------------------------------------

/// Margin-of-victory-weighted Elo update on a completed game.
///
/// `actual` is 1 / 0 / 0.5 for a home win / away win / tie; `expected`
/// comes from the raw pregame rating gap. The update is scaled by
/// `ln(margin + 1) * mov_base * (elo_diff * mov_scale + mov_base)` and is
/// zero-sum by construction; the home-side delta is stored on the game for
/// later reversal. A tie has margin 0 and therefore moves nothing.
pub fn update_elo(teams: &mut [Team], game: &mut Game, k: f64, config: &EloConfig) {
    let elo_diff = teams[game.home].elo - teams[game.away].elo;
    let expected = odds::home_win_probability(elo_diff);

    let actual = if game.home_score > game.away_score {
        1.0
    } else if game.home_score < game.away_score {
        0.0
    } else {
        0.5
    };

    let margin = game.home_score.abs_diff(game.away_score) as f64;
    let mov_multiplier = (margin + 1.0).ln() * config.mov_base;
    let adjustment = mov_multiplier * (elo_diff * config.mov_scale + config.mov_base);

    let home_delta = k * (actual - expected) * adjustment;
    teams[game.home].elo += home_delta;
    teams[game.away].elo -= home_delta;
    game.applied_elo_delta = home_delta;
}

// ---------------------------------------------------------------------------
// Win credit and reversal
// ---------------------------------------------------------------------------

/// Credit the season bookkeeping for a completed game: ties are half a
/// win each, a decisive result is a full win plus a loss-ledger entry
/// (most recent margin only) on the loser.
pub(crate) fn credit_result(teams: &mut [Team], game: &Game) {
    if game.home_score == game.away_score {
        teams[game.home].wins += 0.5;
        teams[game.away].wins += 0.5;
    } else if game.home_score > game.away_score {
        teams[game.home].wins += 1.0;
        teams[game.away].record_loss(game.home, game.home_score - game.away_score);
    } else {
        teams[game.away].wins += 1.0;
        teams[game.home].record_loss(game.away, game.away_score - game.home_score);
    }
}

/// Reverse the stored Elo delta and win credit of a completed game. The
/// loser's ledger entry for the winner is dropped; if a later meeting of
/// the same pair overwrote it, that record is lost too, which the ledger's
/// single-entry shape cannot avoid.
fn undo_completed(teams: &mut [Team], game: &mut Game) {
    let delta = game.applied_elo_delta;
    teams[game.home].elo -= delta;
    teams[game.away].elo += delta;
    game.applied_elo_delta = 0.0;

    if game.home_score == game.away_score {
        teams[game.home].wins -= 0.5;
        teams[game.away].wins -= 0.5;
    } else if game.home_score > game.away_score {
        teams[game.home].wins -= 1.0;
        teams[game.away].losses.remove(&game.home);
    } else {
        teams[game.away].wins -= 1.0;
        teams[game.home].losses.remove(&game.away);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
