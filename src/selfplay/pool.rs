use super::*;
use crate::game::*;
use crate::oracle::*;
use crate::*;
use std::time::Duration;
use std::time::Instant;

/// Runs many independent self-play games against one read-only oracle.
pub struct Pool<'a, G: Game, O: Oracle> {
    oracle: &'a O,
    config: &'a SelfPlayConfig<G::D>,
}

/// Everything one batch of games produced.
#[derive(Debug, Default)]
pub struct Harvest {
    pub trajectories: Vec<Trajectory>,
    pub games: usize,
    pub moves: usize,
    pub elapsed: Duration,
}

impl Harvest {
    pub fn avg_moves(&self) -> f32 {
        self.moves as f32 / self.games.max(1) as f32
    }
    pub fn games_per_sec(&self) -> f32 {
        self.games as f32 / self.elapsed.as_secs_f32().max(1e-6)
    }
    /// mean outcome from P1's seat
    pub fn p1_score(&self) -> f32 {
        let p1 = self
            .trajectories
            .iter()
            .filter(|t| t.seat() == Seat::P1)
            .map(Trajectory::outcome)
            .collect::<Vec<f32>>();
        p1.iter().sum::<f32>() / p1.len().max(1) as f32
    }
}

impl std::fmt::Display for Harvest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<16}{:<16}{:<16}{:<16}",
            format!("games {}", self.games),
            format!("moves {:.1}", self.avg_moves()),
            format!("G/sec {:.1}", self.games_per_sec()),
            format!("P1 {:+.3}", self.p1_score()),
        )
    }
}

impl<'a, G: Game, O: Oracle> Pool<'a, G, O> {
    pub fn new(oracle: &'a O, config: &'a SelfPlayConfig<G::D>) -> Self {
        Self { oracle, config }
    }

    /// Play `games` games; game `i` is seeded with `seed + i`.
    pub fn play(&self, games: usize, seed: u64) -> Result<Harvest> {
        let start = Instant::now();
        let trajectories = self
            .batch(games, seed)?
            .into_iter()
            .flatten()
            .collect::<Vec<Trajectory>>();
        let moves = trajectories.iter().map(Trajectory::len).sum();
        Ok(Harvest {
            trajectories,
            games,
            moves,
            elapsed: start.elapsed(),
        })
    }

    #[cfg(feature = "server")]
    fn batch(&self, games: usize, seed: u64) -> Result<Vec<Vec<Trajectory>>> {
        use rayon::iter::IntoParallelIterator;
        use rayon::iter::ParallelIterator;
        (0..games as u64)
            .into_par_iter()
            .map(|i| play_game::<G, O>(self.oracle, self.config, seed.wrapping_add(i)))
            .collect()
    }
    #[cfg(not(feature = "server"))]
    fn batch(&self, games: usize, seed: u64) -> Result<Vec<Vec<Trajectory>>> {
        (0..games as u64)
            .into_iter()
            .map(|i| play_game::<G, O>(self.oracle, self.config, seed.wrapping_add(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skirmish::*;

    #[test]
    fn pool_matches_sequential_games() {
        let ref config = SelfPlayConfig::new(Deck::standard(), Deck::standard()).with_budget(3);
        let pool = Pool::<Skirmish, _>::new(&Uniform, config);
        let harvest = pool.play(6, 100).unwrap();
        let sequential = (0..6)
            .flat_map(|i| play_game::<Skirmish, _>(&Uniform, config, 100 + i).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(harvest.games, 6);
        assert_eq!(harvest.trajectories, sequential);
        assert_eq!(harvest.moves, sequential.iter().map(Trajectory::len).sum::<usize>());
        assert!(harvest.avg_moves() > 0.);
    }
}
