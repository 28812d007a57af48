// Playoff resolution: division winners, wildcards, and a 7-seed
// single-elimination bracket per conference, finished by a championship
// game between the two conference champions.
//
// Seeding reads final regular-season standings; bracket games are
// ephemeral fixtures that run through the same odds and scoring pipeline
// as regular-season play but update ratings only. Win counts and the loss
// ledger stay regular-season quantities, since they define seeding.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::config::SimConfig;
use crate::league::game::Game;
use crate::league::team::{PlayoffRound, TeamId};
use crate::league::League;
use crate::sim::{odds, outcome, results};

/// Conference name → the 7 seeds in order (4 division winners, then 3
/// wildcards).
pub type Seeding = BTreeMap<String, Vec<TeamId>>;

const DIVISION_WINNERS_PER_CONFERENCE: usize = 4;
const WILDCARDS_PER_CONFERENCE: usize = 3;

// ---------------------------------------------------------------------------
// Tiebreak
// ---------------------------------------------------------------------------

/// Break a win-count tie between two teams.
///
/// When each has a ledger entry against the other, the team that lost by
/// the smaller margin wins the tiebreak. A missing entry on either side
/// (never lost to them, including a sweep) or equal margins falls back to
/// a uniform coin flip.
pub fn resolve_tiebreaker(
    league: &League,
    a: TeamId,
    b: TeamId,
    rng: &mut impl Rng,
) -> TeamId {
    let a_lost_by = league.team(a).losses.get(&b);
    let b_lost_by = league.team(b).losses.get(&a);

    if let (Some(&a_margin), Some(&b_margin)) = (a_lost_by, b_lost_by) {
        match a_margin.cmp(&b_margin) {
            Ordering::Less => return a,
            Ordering::Greater => return b,
            Ordering::Equal => {}
        }
    }

    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

fn by_wins_descending(league: &League) -> impl Fn(&TeamId, &TeamId) -> Ordering + '_ {
    |a, b| {
        league
            .team(*b)
            .wins
            .partial_cmp(&league.team(*a).wins)
            .unwrap_or(Ordering::Equal)
    }
}

/// The division's best team: ranked by win count, with every team tied at
/// the top reduced pairwise through the tiebreaker.
fn division_winner(league: &League, division: &[TeamId], rng: &mut impl Rng) -> TeamId {
    let mut sorted = division.to_vec();
    sorted.sort_by(by_wins_descending(league));

    let top_wins = league.team(sorted[0]).wins;
    let mut winner = sorted[0];
    for &candidate in &sorted[1..] {
        if league.team(candidate).wins < top_wins {
            break;
        }
        winner = resolve_tiebreaker(league, winner, candidate, rng);
    }
    winner
}

/// Seed both conferences from final standings: 4 division winners ranked
/// by win count, then the top 3 remaining teams by win count (wildcard
/// ties resolved only by sort stability). Seeded teams are flagged and
/// start at the wildcard round.
///
/// Returns `None` when the league cannot field the full bracket (not
/// exactly two conferences, or a conference short of 4 divisions / 3
/// wildcard candidates); nothing is marked in that case.
pub fn seed_conferences(league: &mut League, rng: &mut impl Rng) -> Option<Seeding> {
    if league.structure.len() != 2 {
        return None;
    }

    let mut seeding = Seeding::new();
    for (conference, divisions) in &league.structure {
        if divisions.len() != DIVISION_WINNERS_PER_CONFERENCE {
            return None;
        }

        let mut winners: Vec<TeamId> = divisions
            .values()
            .map(|division| division_winner(league, division, rng))
            .collect();
        winners.sort_by(by_wins_descending(league));

        let mut wildcards: Vec<TeamId> = league
            .conference_teams(conference)
            .into_iter()
            .filter(|id| !winners.contains(id))
            .collect();
        wildcards.sort_by(by_wins_descending(league));
        if wildcards.len() < WILDCARDS_PER_CONFERENCE {
            return None;
        }
        wildcards.truncate(WILDCARDS_PER_CONFERENCE);

        let mut seeds = winners;
        seeds.extend(wildcards);
        seeding.insert(conference.clone(), seeds);
    }

    for seeds in seeding.values() {
        for &id in seeds {
            let team = league.team_mut(id);
            team.in_playoffs = true;
            team.playoff_round = PlayoffRound::WildCard;
        }
    }
    Some(seeding)
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

/// Play one ephemeral playoff game and return the winner. Ratings move
/// through the standard update; the fixture itself is discarded.
fn play_game(
    league: &mut League,
    home: TeamId,
    away: TeamId,
    rng: &mut impl Rng,
    config: &SimConfig,
) -> TeamId {
    let mut game = Game::playoff(home, away);
    odds::refresh_ephemeral(league, &mut game, &config.odds);

    let score = outcome::draw_decisive_outcome(rng, &config.outcome, game.home_win_probability);
    game.home_score = score.home;
    game.away_score = score.away;
    game.is_complete = true;

    let (teams, _) = league.parts_mut();
    results::update_elo(teams, &mut game, config.elo.k_sim, &config.elo);

    let winner = if score.home > score.away { home } else { away };
    debug!(
        "playoff: {} {}-{} {} -> {}",
        league.team(home).abbreviation,
        score.home,
        score.away,
        league.team(away).abbreviation,
        league.team(winner).abbreviation
    );
    winner
}

/// Of two seeded teams, the one seeded higher (closer to 1) hosts.
fn order_by_seed(seeds: &[TeamId], a: TeamId, b: TeamId) -> (TeamId, TeamId) {
    let position = |team: TeamId| seeds.iter().position(|&s| s == team).unwrap_or(usize::MAX);
    if position(a) <= position(b) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Run one conference's bracket to its champion.
///
/// Round 1: seed 1 rests; 2 hosts 7, 3 hosts 6, 4 hosts 5. Round 2: seed 1
/// hosts the weakest survivor by win count, the other two survivors meet
/// with the higher seed hosting (the top seed always draws the easiest
/// remaining opponent; the other pairing is not reseeded). Round 3 is the
/// conference championship, higher seed hosting.
fn simulate_conference(
    league: &mut League,
    seeds: &[TeamId],
    rng: &mut impl Rng,
    config: &SimConfig,
) -> TeamId {
    let w1 = play_game(league, seeds[1], seeds[6], rng, config);
    let w2 = play_game(league, seeds[2], seeds[5], rng, config);
    let w3 = play_game(league, seeds[3], seeds[4], rng, config);

    let mut survivors = vec![seeds[0], w1, w2, w3];
    for &team in &survivors {
        league.team_mut(team).playoff_round = PlayoffRound::Divisional;
    }

    survivors[1..].sort_by(|a, b| {
        league
            .team(*a)
            .wins
            .partial_cmp(&league.team(*b).wins)
            .unwrap_or(Ordering::Equal)
    });

    let finalist_a = play_game(league, survivors[0], survivors[1], rng, config);
    let (other_home, other_away) = order_by_seed(seeds, survivors[2], survivors[3]);
    let finalist_b = play_game(league, other_home, other_away, rng, config);

    for &team in &[finalist_a, finalist_b] {
        league.team_mut(team).playoff_round = PlayoffRound::ConferenceChampionship;
    }

    let (home, away) = order_by_seed(seeds, finalist_a, finalist_b);
    play_game(league, home, away, rng, config)
}

/// Simulate the full postseason and return the champion. Conference
/// champions advance to the championship game; the one with the better
/// regular-season record hosts it, ties going to the higher rating.
pub fn simulate_playoffs(
    league: &mut League,
    seeding: &Seeding,
    rng: &mut impl Rng,
    config: &SimConfig,
) -> Option<TeamId> {
    let mut champions = Vec::with_capacity(2);
    for seeds in seeding.values() {
        let champion = simulate_conference(league, seeds, rng, config);
        league.team_mut(champion).playoff_round = PlayoffRound::SuperBowl;
        champions.push(champion);
    }

    let (a, b) = match champions[..] {
        [a, b] => (a, b),
        _ => return None,
    };

    let a_hosts = match league
        .team(a)
        .wins
        .partial_cmp(&league.team(b).wins)
        .unwrap_or(Ordering::Equal)
    {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => league.team(a).elo >= league.team(b).elo,
    };
    let (home, away) = if a_hosts { (a, b) } else { (b, a) };

    let champion = play_game(league, home, away, rng, config);
    league.team_mut(champion).playoff_round = PlayoffRound::Champion;
    Some(champion)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
