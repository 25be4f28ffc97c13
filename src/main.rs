use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use pinfall::config::SimulationWeights;
use pinfall::error::PfResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with simulation weights; explicit flags still win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Simulate(cmd::simulate::SimulateArgs),
    Score(cmd::score::ScoreArgs),
    Replay(cmd::replay::ReplayArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Simulate(args) => {
            let mut config = args.config.clone();
            match resolve_weights(cli.config.as_deref(), &args.config.weights, &matches) {
                Ok(Some(weights)) => config.weights = weights,
                Ok(None) => info!("No weights file given. Using embedded defaults."),
                Err(e) => fail(e),
            }
            cmd::simulate::run(args, config)
        }
        Commands::Score(args) => cmd::score::run(args),
        Commands::Replay(args) => cmd::replay::run(args),
    };

    if let Err(e) = result {
        fail(e);
    }
}

/// Loads the weights file, if any, and lays explicit CLI flags over it.
fn resolve_weights(
    path: Option<&str>,
    cli_weights: &SimulationWeights,
    matches: &clap::ArgMatches,
) -> PfResult<Option<SimulationWeights>> {
    let Some(path) = path else {
        cli_weights.validate()?;
        return Ok(None);
    };
    info!("Loading weights from: {}", path);
    let mut file_weights = SimulationWeights::load_from_file(path)?;
    if let Some(sub_matches) = matches.subcommand_matches("simulate") {
        file_weights.merge_from_cli(cli_weights, sub_matches);
    }
    file_weights.validate()?;
    Ok(Some(file_weights))
}

fn fail(e: pinfall::error::PinfallError) -> ! {
    error!("{}", e);
    process::exit(1);
}
