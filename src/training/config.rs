use crate::ppo::PpoConfig;
use crate::selfplay::*;
use crate::*;
use std::path::PathBuf;

/// Everything a training run needs besides the oracle itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig<D> {
    pub selfplay: SelfPlayConfig<D>,
    pub ppo: PpoConfig,
    /// self-play games per oracle version
    pub games: usize,
    pub iterations: usize,
    /// where each published version is written, if anywhere
    pub checkpoint: Option<PathBuf>,
    /// base seed of the self-play deals
    pub seed: u64,
}

impl<D> PipelineConfig<D> {
    pub fn new(a: D, b: D) -> Self {
        Self {
            selfplay: SelfPlayConfig::new(a, b),
            ppo: PpoConfig::default(),
            games: GAMES_PER_ITERATION,
            iterations: TRAINING_ITERATIONS,
            checkpoint: Some(PathBuf::from(CHECKPOINT_PATH)),
            seed: 0,
        }
    }
}
