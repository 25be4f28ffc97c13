use crate::reports;
use clap::Args;
use pinfall::api;
use pinfall::error::PfResult;
use pinfall::notation;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Scoresheet marks, packed (`X7/9-`) or space separated.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub marks: Vec<String>,

    #[arg(long, default_value = "bowler")]
    pub name: String,
}

pub fn run(args: ScoreArgs) -> PfResult<()> {
    let marks = notation::parse_game(&args.marks.join(" "))?;
    let card = api::score_marks(&args.name, &marks)?;

    reports::print_card(&args.name, &card);
    println!("Final Score: {}", card.final_score());
    Ok(())
}
