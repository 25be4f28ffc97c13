use crate::reports;
use clap::Args;
use pinfall::api;
use pinfall::error::PfResult;
use pinfall::store::SavedState;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Saved state JSON file.
    #[arg(long)]
    pub state: PathBuf,
}

pub fn run(args: ReplayArgs) -> PfResult<()> {
    let state = SavedState::load(&args.state)?;
    info!(
        "Loaded {} bowler(s) and {} game(s)",
        state.bowlers.len(),
        state.games.len()
    );

    for game in &state.games {
        println!("\n=== {} ({}) ===", game.name, game.id);
        for card in api::restore_cards(game) {
            let name = state
                .bowler(card.bowler_id())
                .map(|b| b.name.clone())
                .unwrap_or_else(|| card.bowler_id().to_string());
            reports::print_card(&name, &card);
            println!("Final Score: {}", card.final_score());
        }
    }

    reports::print_averages(&state);
    Ok(())
}
