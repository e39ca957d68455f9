use crate::*;

/// Tuning knobs of one search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// exploration constant of the PUCT rule
    pub c_puct: Utility,
    /// determinization attempts per simulation before giving up
    pub retries: usize,
    /// base seed, mixed with the root information set per call
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            c_puct: C_PUCT,
            retries: DETERMINIZATION_RETRIES,
            seed: SEARCH_SEED,
        }
    }
}

impl SearchConfig {
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// deterministically derive the search RNG from the seed and
    /// the position, so that repeated calls reproduce and distinct
    /// positions decorrelate.
    pub fn rng<I: std::hash::Hash>(&self, info: &I) -> rand::rngs::SmallRng {
        use rand::SeedableRng;
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hash;
        use std::hash::Hasher;
        let ref mut hasher = DefaultHasher::new();
        self.seed.hash(hasher);
        info.hash(hasher);
        rand::rngs::SmallRng::seed_from_u64(hasher.finish())
    }
}
