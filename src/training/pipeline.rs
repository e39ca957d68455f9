use super::*;
use crate::checkpoint::Checkpoint;
use crate::game::*;
use crate::oracle::*;
use crate::ppo::*;
use crate::selfplay::*;
use crate::*;
use std::sync::Arc;

/// The closed training loop.
///
/// Each iteration freezes the current snapshot, harvests self-play games
/// against it in parallel, runs one single-threaded PPO update, and
/// publishes the result as the next version.
pub struct Pipeline<G: Game> {
    config: PipelineConfig<G::D>,
    snapshot: Arc<Snapshot>,
    ppo: Ppo,
    metrics: Metrics,
}

impl<G: Game> Pipeline<G> {
    pub fn new(config: PipelineConfig<G::D>, snapshot: Snapshot) -> Self {
        Self {
            ppo: Ppo::new(config.ppo.clone()),
            snapshot: Arc::new(snapshot),
            metrics: Metrics::default(),
            config,
        }
    }

    /// Start from the configured checkpoint when `resume` is set and the
    /// file exists, otherwise from a fresh network.
    pub fn load(config: PipelineConfig<G::D>, resume: bool) -> Result<Self> {
        let snapshot = match config.checkpoint.as_deref() {
            Some(path) if resume && path.exists() => {
                Checkpoint::load(path, G::FEATURES, <G::A as Action>::SPACE)?
            }
            _ => Snapshot::initial(G::FEATURES, <G::A as Action>::SPACE, NETWORK_SEED)?,
        };
        Ok(Self::new(config, snapshot))
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.clone()
    }
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// One full snapshot → self-play → update → publish cycle.
    pub fn iterate(&mut self) -> Result<Report> {
        let frozen = self.snapshot.clone();
        let seed = self
            .config
            .seed
            .wrapping_add((frozen.version() * self.config.games) as u64);
        let harvest = Pool::<G, Snapshot>::new(frozen.as_ref(), &self.config.selfplay)
            .play(self.config.games, seed)?;
        log::debug!("v{} self-play {}", frozen.version(), harvest);
        self.metrics.record(harvest.games, harvest.moves);
        let (next, report) = self.ppo.update(frozen.as_ref(), harvest.trajectories)?;
        if let Some(ref path) = self.config.checkpoint {
            Checkpoint::try_from(&next)?.save(path)?;
        }
        log::info!("published v{} {}", next.version(), report);
        self.snapshot = Arc::new(next);
        Ok(report)
    }

    /// Iterate until the configured count or a graceful interrupt.
    pub fn train(&mut self) -> Result<()> {
        log::info!(
            "training from v{} for {} iterations of {} games on {} threads",
            self.snapshot.version(),
            self.config.iterations,
            self.config.games,
            Self::threads()
        );
        for _ in 0..self.config.iterations {
            if crate::interrupted() {
                break;
            }
            self.iterate()?;
            if let Some(stats) = self.metrics.checkpoint() {
                log::info!("{}", stats);
            }
        }
        log::info!("{}", self.metrics.summary());
        Ok(())
    }

    #[cfg(feature = "server")]
    fn threads() -> usize {
        num_cpus::get()
    }
    #[cfg(not(feature = "server"))]
    fn threads() -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skirmish::*;

    fn config(checkpoint: Option<std::path::PathBuf>) -> PipelineConfig<Deck> {
        let mut config = PipelineConfig::new(
            Deck::try_from("1 2 3 4 5 6").unwrap(),
            Deck::try_from("2 3 4 5 6 7").unwrap(),
        );
        config.selfplay = config.selfplay.with_budget(2);
        config.games = 4;
        config.iterations = 2;
        config.checkpoint = checkpoint;
        config
    }

    #[test]
    fn iterations_publish_new_versions() {
        let mut pipeline = Pipeline::<Skirmish>::load(config(None), false).unwrap();
        let before = pipeline.snapshot();
        pipeline.train().unwrap();
        let after = pipeline.snapshot();
        assert_eq!(before.version(), 0);
        assert_eq!(after.version(), 2);
        assert_ne!(before.network(), after.network());
        assert_eq!(pipeline.metrics().games(), 8);
    }

    #[test]
    fn resume_from_checkpoint() {
        let path = std::env::temp_dir()
            .join(format!("robotcg-pipeline-{}", std::process::id()))
            .join("oracle.json");
        let mut pipeline = Pipeline::<Skirmish>::load(config(Some(path.clone())), false).unwrap();
        pipeline.iterate().unwrap();
        let resumed = Pipeline::<Skirmish>::load(config(Some(path.clone())), true).unwrap();
        assert_eq!(resumed.snapshot().version(), 1);
        assert_eq!(resumed.snapshot().network(), pipeline.snapshot().network());
        let fresh = Pipeline::<Skirmish>::load(config(Some(path.clone())), false).unwrap();
        assert_eq!(fresh.snapshot().version(), 0);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
