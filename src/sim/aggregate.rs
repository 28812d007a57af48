// Multi-season Monte Carlo aggregation.
//
// Runs N independent trials from the same preseason prior and tabulates,
// per team, the average win count and the empirical probability of
// reaching each postseason milestone. Per-trial child RNGs are seeded
// from the caller's master stream, so a fixed master seed reproduces the
// whole experiment.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::SimConfig;
use crate::league::team::{PlayoffRound, TeamId};
use crate::league::League;
use crate::sim::season;

/// Aggregate results for one team across all trials. The milestone fields
/// are fractions of trials in which the team reached at least that stage.
#[derive(Debug, Clone)]
pub struct TeamSummary {
    pub team: TeamId,
    pub average_wins: f64,
    /// Made the playoff field.
    pub wildcard: f64,
    /// Survived the wildcard round.
    pub divisional: f64,
    /// Reached the conference championship game.
    pub conference: f64,
    /// Reached the championship game.
    pub super_bowl: f64,
    /// Won it all.
    pub championship: f64,
}

const MILESTONES: [PlayoffRound; 5] = [
    PlayoffRound::WildCard,
    PlayoffRound::Divisional,
    PlayoffRound::ConferenceChampionship,
    PlayoffRound::SuperBowl,
    PlayoffRound::Champion,
];

/// Run `trials` independent seasons and summarize them per team.
///
/// Every trial starts with a mandatory reset to the preseason prior
/// (baseline ratings plus externally-supplied results), so trials are
/// exchangeable samples rather than a single drifting timeline.
pub fn run_trials(
    league: &mut League,
    trials: usize,
    rng: &mut impl Rng,
    config: &SimConfig,
) -> Vec<TeamSummary> {
    if trials == 0 {
        return Vec::new();
    }

    let team_count = league.num_teams();
    let mut win_totals = vec![0.0f64; team_count];
    let mut reached = vec![[0usize; MILESTONES.len()]; team_count];

    for trial in 0..trials {
        let mut trial_rng = ChaCha8Rng::seed_from_u64(rng.gen());
        season::reset_for_trial(league, config);
        season::simulate_season(league, &mut trial_rng, config);

        for team in &league.teams {
            win_totals[team.id] += team.wins;
            for (slot, &milestone) in MILESTONES.iter().enumerate() {
                if team.playoff_round >= milestone {
                    reached[team.id][slot] += 1;
                }
            }
        }

        if (trial + 1) % 100 == 0 {
            info!("simulated {} of {} seasons", trial + 1, trials);
        }
    }

    let denom = trials as f64;
    (0..team_count)
        .map(|id| TeamSummary {
            team: id,
            average_wins: win_totals[id] / denom,
            wildcard: reached[id][0] as f64 / denom,
            divisional: reached[id][1] as f64 / denom,
            conference: reached[id][2] as f64 / denom,
            super_bowl: reached[id][3] as f64 / denom,
            championship: reached[id][4] as f64 / denom,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
