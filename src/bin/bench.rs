//! Bench Binary
//!
//! Throughput measurements for the hot paths:
//! `--games N` plays N self-play games, `--encodings N` encodes N states.
//! The average move count is printed as a cheap regression signal.

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robotcg::game::*;
use robotcg::oracle::*;
use robotcg::selfplay::*;
use robotcg::skirmish::*;
use robotcg::*;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Self-play and encoding throughput", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 0)]
    games: usize,
    #[arg(long, default_value_t = 0)]
    encodings: usize,
    #[arg(long, default_value_t = SEARCH_BUDGET)]
    budget: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// evaluate with a fresh network instead of uniform priors
    #[arg(long)]
    network: bool,
}

fn games(args: &Args) -> anyhow::Result<()> {
    let ref config =
        SelfPlayConfig::new(Deck::standard(), Deck::standard()).with_budget(args.budget);
    let harvest = match args.network {
        true => {
            let ref snapshot = Snapshot::initial(Skirmish::FEATURES, Move::SPACE, NETWORK_SEED)?;
            Pool::<Skirmish, _>::new(snapshot, config).play(args.games, args.seed)?
        }
        false => Pool::<Skirmish, _>::new(&Uniform, config).play(args.games, args.seed)?,
    };
    log::info!("{}", harvest);
    log::info!("average moves per game {:.3}", harvest.avg_moves());
    Ok(())
}

fn encodings(args: &Args) -> anyhow::Result<()> {
    let ref mut rng = SmallRng::seed_from_u64(args.seed);
    let deck = Deck::standard();
    let mut state = Skirmish::initialize(&deck, &deck, rng)?;
    let mut checksum = 0.;
    let start = Instant::now();
    for _ in 0..args.encodings {
        checksum += state.encode().iter().sum::<f32>();
        state = match state.legal().first() {
            Some(&action) => state.apply(action),
            None => Skirmish::initialize(&deck, &deck, rng)?,
        };
    }
    let elapsed = start.elapsed().as_secs_f64().max(1e-9);
    log::info!(
        "{} encodings in {:.3}s ({:.0} E/sec, checksum {:.1})",
        args.encodings,
        elapsed,
        args.encodings as f64 / elapsed,
        checksum
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log();
    log::info!("benchmarking on {} threads", num_cpus::get());
    if args.games > 0 {
        games(&args)?;
    }
    if args.encodings > 0 {
        encodings(&args)?;
    }
    Ok(())
}
