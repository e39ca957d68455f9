//! Trainer Binary
//!
//! Runs the self-play / PPO loop on Skirmish, publishing a checkpoint
//! after every iteration. Type Q + Enter to stop after the current
//! iteration, or set TRAIN_DURATION (e.g. "2h").

use clap::Parser;
use robotcg::skirmish::*;
use robotcg::training::*;
use robotcg::*;

#[derive(Parser)]
#[command(author, version, about = "Self-play PPO training for Skirmish", long_about = None)]
struct Args {
    #[arg(long, default_value_t = TRAINING_ITERATIONS)]
    iterations: usize,
    #[arg(long, default_value_t = GAMES_PER_ITERATION)]
    games: usize,
    #[arg(long, default_value_t = SEARCH_BUDGET)]
    budget: usize,
    #[arg(long, default_value = CHECKPOINT_PATH)]
    checkpoint: std::path::PathBuf,
    /// continue from the checkpoint if it exists
    #[arg(long)]
    resume: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// P1 decklist as card powers, e.g. "1 1 2 2 3 3"
    #[arg(long)]
    deck1: Option<String>,
    /// P2 decklist as card powers
    #[arg(long)]
    deck2: Option<String>,
}

fn deck(list: Option<&str>) -> Result<Deck> {
    match list {
        Some(list) => Deck::try_from(list),
        None => Ok(Deck::standard()),
    }
}

fn train(args: Args) -> Result<()> {
    let mut config = PipelineConfig::new(
        deck(args.deck1.as_deref())?,
        deck(args.deck2.as_deref())?,
    );
    config.iterations = args.iterations;
    config.games = args.games;
    config.seed = args.seed;
    config.checkpoint = Some(args.checkpoint);
    config.selfplay = config.selfplay.with_budget(args.budget);
    Pipeline::<Skirmish>::load(config, args.resume)?.train()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log();
    brb();
    train(args).inspect_err(|e| match e.is_config() {
        true => log::error!("configuration rejected: {}", e),
        false => log::error!("training aborted: {}", e),
    })?;
    Ok(())
}
