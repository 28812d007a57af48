// Season simulator entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, RUST_LOG-filterable)
// 2. Parse CLI arguments
// 3. Load simulation config
// 4. Load team and schedule CSVs, assemble the league
// 5. Replay file-supplied results and compute initial odds
// 6. Run the interactive command loop

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use gridcast::app::App;
use gridcast::config;
use gridcast::league::{loader, League};
use gridcast::sim::results;

/// Elo-driven season simulator: load a schedule, enter results, and
/// Monte-Carlo the rest of the season.
#[derive(Debug, Parser)]
#[command(name = "gridcast", version, about)]
struct Args {
    /// Schedule CSV: one row per team, week cells `OPP#Y/N#home#away` or `BYE`.
    schedule: PathBuf,

    /// Team CSV: name, abbreviation, color, elo, city, latitude,
    /// longitude, conference, division.
    #[arg(long, default_value = "static/preseason_teams.csv")]
    teams: PathBuf,

    /// Simulation parameter file (defaults to config/sim.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master RNG seed for reproducible simulations.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let sim_config =
        config::load(args.config.as_deref()).context("failed to load simulation config")?;

    let team_records = loader::load_teams(&args.teams)
        .with_context(|| format!("failed to load team file {}", args.teams.display()))?;
    let schedule_rows = loader::load_schedule(&args.schedule)
        .with_context(|| format!("failed to load schedule file {}", args.schedule.display()))?;

    let mut league = League::from_records(team_records, schedule_rows)
        .context("failed to assemble the league")?;
    results::replay_user_results(&mut league, &sim_config);

    info!(
        "Loaded {} teams, {} weeks, {} fixtures",
        league.num_teams(),
        league.schedule.num_weeks(),
        league.schedule.games().len()
    );

    let rng = match args.seed {
        Some(seed) => {
            info!("seeding simulations with {seed}");
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let mut app = App::new(league, sim_config, rng);
    app.run()
}

/// Log to stderr so tables on stdout stay clean; default level info.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridcast=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
