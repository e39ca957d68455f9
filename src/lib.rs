//! Information-set MCTS and self-play PPO training for
//! two-player hidden-information card games.
//!
//! The crate is organised leaves first:
//! - [`game`] — the rules-engine contract (state machine, information sets, dense actions)
//! - [`skirmish`] — a reference trick-taking game implementing that contract
//! - [`oracle`] / [`network`] — the policy-value function and its numeric backend
//! - [`search`] — determinized information-set tree search guided by the oracle
//! - [`selfplay`] — full games driven by search, recorded as trajectories
//! - [`ppo`] — clipped-surrogate policy/value updates over trajectories
//! - [`training`] — the closed snapshot → self-play → update → publish loop

pub mod checkpoint;
pub mod error;
pub mod game;
pub mod network;
pub mod oracle;
pub mod ppo;
pub mod search;
pub mod selfplay;
pub mod skirmish;
pub mod training;

pub use error::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Expected values, advantages, returns and payoffs.
pub type Utility = f32;
/// Priors, visit distributions and sampling weights.
pub type Probability = f32;
/// Temperature parameters and information-theoretic measures.
pub type Entropy = f32;
/// Monotonic counter identifying one published oracle snapshot.
pub type Version = usize;

// ============================================================================
// REFERENCE GAME (see `skirmish`)
// ============================================================================
/// Distinct card kinds; a card of kind k has power k + 1.
pub const KINDS: usize = 8;
/// Cards held in hand after every refill.
pub const HAND_SIZE: usize = 3;
/// Largest legal deck.
pub const DECK_MAX: usize = 30;
/// Hard cap on moves in one self-play game. Reaching it is scored as a forced terminal.
pub const MAX_MOVES: usize = 512;

// ============================================================================
// POLICY-VALUE NETWORK
// ============================================================================
/// Width of the first encoder layer in both the policy and the value tower.
/// The second encoder layer and the value head are half as wide.
pub const HIDDEN: usize = 64;
/// Variance smoothing inside the encoder layer norms.
pub const LAYER_NORM_EPSILON: f64 = 1e-5;
/// Logit added to illegal actions before the softmax.
pub const MASKED_LOGIT: f32 = -1e9;
/// Seed used to initialise a fresh network.
pub const NETWORK_SEED: u64 = 0x5EED;
/// Floor applied to recorded behaviour probabilities before taking logs.
pub const PROBABILITY_MIN: Probability = 1e-8;

// ============================================================================
// ISMCTS
// ============================================================================
/// Exploration constant of the PUCT rule Q + c·P·√N / (1 + n).
pub const C_PUCT: Utility = 1.5;
/// Simulations per decision during self-play.
pub const SEARCH_BUDGET: usize = 64;
/// Determinization attempts per simulation before the search gives up.
pub const DETERMINIZATION_RETRIES: usize = 64;
/// Base seed of the search RNG; mixed with the root information set per call.
pub const SEARCH_SEED: u64 = 0xC0FFEE;

// ============================================================================
// SELF-PLAY
// ============================================================================
/// Visit-count temperature used while sampling opening moves.
pub const TEMPERATURE: Entropy = 1.0;
/// Number of opening moves sampled from visit counts instead of taken greedily.
pub const EXPLORATION_MOVES: usize = 6;
/// Discount applied when backfilling the terminal outcome (1.0 = full backfill).
pub const GAMMA: Utility = 1.0;

// ============================================================================
// PPO
// ============================================================================
/// Passes over each harvested batch.
pub const PPO_EPOCHS: usize = 4;
/// Samples per gradient step.
pub const PPO_MINIBATCH: usize = 64;
/// Surrogate ratio clip ε.
pub const PPO_CLIP: Probability = 0.2;
/// Weight of the value regression loss.
pub const PPO_VALUE_COEF: Utility = 0.5;
/// Weight of the entropy bonus.
pub const PPO_ENTROPY_COEF: Entropy = 0.01;
/// Weight of the cross-entropy toward search visit targets.
pub const PPO_DISTILL_COEF: Utility = 0.0;
/// Generalized advantage estimation λ (1.0 = return minus value).
pub const GAE_LAMBDA: Utility = 1.0;
/// Adam step size.
pub const LEARNING_RATE: f64 = 3e-4;
/// Adam first moment decay.
pub const ADAM_BETA1: f64 = 0.9;
/// Adam second moment decay.
pub const ADAM_BETA2: f64 = 0.999;
/// Adam denominator smoothing.
pub const ADAM_EPSILON: f64 = 1e-8;
/// Global gradient norm ceiling.
pub const MAX_GRAD_NORM: f32 = 1.0;
/// Seed of the minibatch shuffler.
pub const PPO_SEED: u64 = 0xBA7C4;

// ============================================================================
// TRAINING INFRASTRUCTURE
// ============================================================================
/// Self-play games harvested per oracle version.
pub const GAMES_PER_ITERATION: usize = 128;
/// Training iterations run by default.
pub const TRAINING_ITERATIONS: usize = 1024;
/// Default checkpoint location.
pub const CHECKPOINT_PATH: &str = "checkpoints/oracle.json";
/// Interval between progress log messages during training.
pub const TRAINING_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Global interrupt flag for graceful shutdown coordination.
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Optional training deadline from TRAIN_DURATION env var.
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Check if graceful shutdown was requested (via stdin "Q") or deadline reached.
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
        || DEADLINE
            .get()
            .map_or(false, |d| std::time::Instant::now() >= *d)
}

/// Register graceful interrupt handler. Type "Q" + Enter to stop after current iteration.
/// Optionally set TRAIN_DURATION env var (e.g., "2h", "30m") for timed runs.
pub fn brb() {
    if let Ok(duration) = std::env::var("TRAIN_DURATION") {
        if let Some(deadline) = parse_duration(&duration) {
            let _ = DEADLINE.set(std::time::Instant::now() + deadline);
            log::info!("training will stop after {}", duration);
        }
    }
    std::thread::spawn(|| {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().to_uppercase() == "Q" => {
                    log::warn!("graceful interrupt requested, finishing current iteration...");
                    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
            }
        }
    });
}

/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}
