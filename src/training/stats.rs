use std::time::Duration;
use std::time::Instant;

/// Progress accessors shared by everything that reports on a training run,
/// with default formatting for periodic and final log lines.
pub trait TrainingStats {
    fn iteration(&self) -> usize;
    fn games(&self) -> usize;
    fn moves(&self) -> usize;
    fn elapsed(&self) -> Duration;
    fn format(&self) -> String {
        let rates = self.games() as f64 / self.elapsed().as_secs().max(1) as f64;
        format!(
            "{:<20}{:<20}{:<20}{:<20}",
            format!("iteration {}", self.iteration()),
            format!("games {}", self.games()),
            format!("moves {}", self.moves()),
            format!("G/sec {:.1}", rates),
        )
    }
    fn stats(&self) -> String {
        self.format()
    }
    fn summary(&self) -> String {
        format!("training stopped\n{}", self.format())
    }
}

/// Accumulated counters of one run. Owns the timing for both the
/// overall rate and the periodic checkpoint log line.
pub struct Metrics {
    iteration: usize,
    games: usize,
    moves: usize,
    start: Instant,
    check: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            iteration: 0,
            games: 0,
            moves: 0,
            start: now,
            check: now,
        }
    }
}

impl Metrics {
    pub fn record(&mut self, games: usize, moves: usize) {
        self.iteration += 1;
        self.games += games;
        self.moves += moves;
    }
    /// Returns stats only if the log interval has elapsed.
    pub fn checkpoint(&mut self) -> Option<String> {
        if self.check.elapsed() >= crate::TRAINING_LOG_INTERVAL {
            self.check = Instant::now();
            Some(self.stats())
        } else {
            None
        }
    }
}

impl TrainingStats for Metrics {
    fn iteration(&self) -> usize {
        self.iteration
    }
    fn games(&self) -> usize {
        self.games
    }
    fn moves(&self) -> usize {
        self.moves
    }
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
