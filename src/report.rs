// Console table rendering for the interactive commands: the per-team
// schedule dump, conference/division standings, and the Monte Carlo
// summary. Rendering builds strings so the tables are testable; the
// print wrappers just write them to stdout.

use std::fmt::Write as _;

use crate::league::team::PlayoffRound;
use crate::league::League;
use crate::sim::aggregate::TeamSummary;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Every team's row: a header with rating and win count, then one line
/// per week from that team's perspective.
pub fn render_schedule(league: &League) -> String {
    let mut out = String::new();
    let rule = "-".repeat(60);

    for team in &league.teams {
        let _ = writeln!(
            out,
            "{:<26} | Elo: {:7.1} | Wins: {:4.1}",
            team.name, team.elo, team.wins
        );
        let _ = writeln!(out, "{rule}");
        for (week, &game_id) in league.schedule.row(team.id).iter().enumerate() {
            let game = league.schedule.game(game_id);
            let opponent = league.team(game.opponent_of(team.id));
            let _ = writeln!(
                out,
                "  Week {:<2} | {}",
                week,
                game.describe_for(team, opponent)
            );
        }
        out.push('\n');
    }
    out
}

pub fn print_schedule(league: &League) {
    print!("{}", render_schedule(league));
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Conference and division standings, each division sorted by win count.
pub fn render_standings(league: &League) -> String {
    let mut out = String::new();

    for (conference, divisions) in &league.structure {
        let _ = writeln!(out, "{conference}");
        for (division, teams) in divisions {
            let _ = writeln!(out, "  {division}");
            let mut ranked = teams.clone();
            ranked.sort_by(|a, b| {
                league
                    .team(*b)
                    .wins
                    .partial_cmp(&league.team(*a).wins)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for id in ranked {
                let team = league.team(id);
                let postseason = if team.playoff_round > PlayoffRound::Out {
                    format!("  [{}]", team.playoff_round.label())
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    "    {:<4} {:<26} {:5.1} wins | Elo {:7.1}{}",
                    team.abbreviation, team.name, team.wins, team.elo, postseason
                );
            }
        }
    }
    out
}

pub fn print_standings(league: &League) {
    print!("{}", render_standings(league));
}

// ---------------------------------------------------------------------------
// Monte Carlo summary
// ---------------------------------------------------------------------------

/// The aggregate table: average wins plus the five postseason milestone
/// probabilities, best teams first.
pub fn render_summary(league: &League, summaries: &[TeamSummary], trials: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Results over {trials} simulated seasons");
    let _ = writeln!(
        out,
        "{:<26} | {:>8} | {:>8} | {:>10} | {:>10} | {:>10} | {:>8}",
        "Team", "Avg Wins", "WildCard", "Divisional", "Conference", "Super Bowl", "Champion"
    );
    let _ = writeln!(out, "{}", "-".repeat(98));

    let mut ordered: Vec<&TeamSummary> = summaries.iter().collect();
    ordered.sort_by(|a, b| {
        b.average_wins
            .partial_cmp(&a.average_wins)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                league
                    .team(a.team)
                    .abbreviation
                    .cmp(&league.team(b.team).abbreviation)
            })
    });

    for summary in ordered {
        let team = league.team(summary.team);
        let _ = writeln!(
            out,
            "{:<26} | {:>8.2} | {:>8.3} | {:>10.3} | {:>10.3} | {:>10.3} | {:>8.3}",
            team.name,
            summary.average_wins,
            summary.wildcard,
            summary.divisional,
            summary.conference,
            summary.super_bowl,
            summary.championship
        );
    }
    out
}

pub fn print_summary(league: &League, summaries: &[TeamSummary], trials: usize) {
    print!("{}", render_summary(league, summaries, trials));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::loader::{CellRecord, ScheduleRowRecord, TeamRecord};

    fn small_league() -> League {
        let records = vec![
            TeamRecord {
                name: "Alpha".to_string(),
                abbreviation: "AAA".to_string(),
                color: "grey".to_string(),
                elo: 1500.0,
                city: "Alphaville".to_string(),
                latitude: 40.0,
                longitude: -80.0,
                conference: "East".to_string(),
                division: "North".to_string(),
            },
            TeamRecord {
                name: "Beta".to_string(),
                abbreviation: "BBB".to_string(),
                color: "grey".to_string(),
                elo: 1500.0,
                city: "Betatown".to_string(),
                latitude: 41.0,
                longitude: -81.0,
                conference: "East".to_string(),
                division: "North".to_string(),
            },
        ];
        let rows = vec![
            ScheduleRowRecord {
                team_name: "Alpha".to_string(),
                cells: vec![
                    CellRecord::Matchup {
                        opponent: "BBB".to_string(),
                        row_team_away: false,
                        complete: false,
                        home_score: 0,
                        away_score: 0,
                    },
                    CellRecord::Bye,
                ],
            },
            ScheduleRowRecord {
                team_name: "Beta".to_string(),
                cells: vec![
                    CellRecord::Matchup {
                        opponent: "AAA".to_string(),
                        row_team_away: true,
                        complete: false,
                        home_score: 0,
                        away_score: 0,
                    },
                    CellRecord::Bye,
                ],
            },
        ];
        League::from_records(records, rows).unwrap()
    }

    #[test]
    fn schedule_shows_both_perspectives_and_byes() {
        let league = small_league();
        let rendered = render_schedule(&league);
        assert!(rendered.contains("Alpha"));
        assert!(rendered.contains("BBB|0-0|"));
        assert!(rendered.contains("@AAA|0-0|"));
        assert!(rendered.contains("BYE"));
    }

    #[test]
    fn standings_group_by_conference_and_division() {
        let mut league = small_league();
        league.team_mut(1).wins = 2.0;
        let rendered = render_standings(&league);
        assert!(rendered.contains("East"));
        assert!(rendered.contains("North"));
        // Beta leads, so it renders before Alpha.
        let beta_at = rendered.find("Beta").unwrap();
        let alpha_at = rendered.find("Alpha").unwrap();
        assert!(beta_at < alpha_at);
    }

    #[test]
    fn summary_orders_by_average_wins() {
        let league = small_league();
        let summaries = vec![
            TeamSummary {
                team: 0,
                average_wins: 4.0,
                wildcard: 0.2,
                divisional: 0.1,
                conference: 0.05,
                super_bowl: 0.02,
                championship: 0.01,
            },
            TeamSummary {
                team: 1,
                average_wins: 9.0,
                wildcard: 0.9,
                divisional: 0.6,
                conference: 0.4,
                super_bowl: 0.2,
                championship: 0.1,
            },
        ];
        let rendered = render_summary(&league, &summaries, 100);
        assert!(rendered.contains("100 simulated seasons"));
        let beta_at = rendered.find("Beta").unwrap();
        let alpha_at = rendered.find("Alpha").unwrap();
        assert!(beta_at < alpha_at);
    }
}
