use crate::reports;
use clap::Args;
use pinfall::api::{self, SimulatedGame};
use pinfall::config::Config;
use pinfall::error::{PfResult, PinfallError};
use pinfall::roster::{self, KnownBowler};
use pinfall::simulator::{PinKnockdownSimulator, Skill};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: Config,

    /// Skill rating in 0..=1.
    #[arg(long, conflicts_with = "bowler")]
    pub skill: Option<f32>,

    /// Preset bowler (alice, bob, carol, dave, eve, mallory).
    #[arg(long)]
    pub bowler: Option<String>,

    /// Write one CSV row per game.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn run(args: SimulateArgs, config: Config) -> PfResult<()> {
    let (bowler_id, skill) = resolve_bowler(&args)?;
    if config.session.games == 0 {
        return Err(PinfallError::Config("--games must be at least 1".to_string()));
    }
    let seed = config.session.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Seed: {}", seed);

    let simulator = PinKnockdownSimulator::new(config.weights);
    let games = api::simulate_games(&bowler_id, skill, &simulator, seed, config.session.games)?;

    if let Some(first) = games.first() {
        reports::print_card(&format!("{} (seed {})", bowler_id, first.seed), &first.card);
    }
    reports::print_summary(&games);
    for game in &games {
        println!("Final Score: {}", game.card.final_score());
    }

    if let Some(path) = &args.export {
        export_csv(path, &games)?;
        info!("Exported {} game(s) to {}", games.len(), path.display());
    }
    Ok(())
}

fn resolve_bowler(args: &SimulateArgs) -> PfResult<(String, Skill)> {
    if let Some(name) = &args.bowler {
        let bowler = KnownBowler::from_str(name)
            .map_err(|_| PinfallError::Validation(format!("unknown bowler '{}'", name)))?;
        return Ok((bowler.to_string(), bowler.skill()));
    }
    match args.skill {
        Some(value) => Ok(("bowler".to_string(), Skill::new(value)?)),
        None => Ok(("bowler".to_string(), roster::default_skill())),
    }
}

fn export_csv(path: &Path, games: &[SimulatedGame]) -> PfResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["game".to_string(), "seed".to_string()];
    header.extend((1..=10).map(|f| format!("frame_{}", f)));
    header.push("final".to_string());
    writer.write_record(&header)?;

    for game in games {
        let mut row = vec![(game.index + 1).to_string(), game.seed.to_string()];
        row.extend(
            game.card
                .cumulative_scores()
                .iter()
                .map(|s| s.map(|v| v.to_string()).unwrap_or_default()),
        );
        row.push(game.card.final_score().to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
