use crate::game::*;
use crate::*;

/// What one search call concluded at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A: Action> {
    /// the chosen action
    pub action: A,
    /// root visit counts over the dense action space
    pub visits: Vec<usize>,
    /// normalized root visits over the dense action space
    pub policy: Vec<Probability>,
    /// root oracle priors over the dense action space
    pub prior: Vec<Probability>,
    /// root oracle value for the acting player; zero when no search ran
    pub value: Utility,
    /// completed simulations
    pub simulations: usize,
    /// determinizations thrown away along the way
    pub rejected: usize,
}

impl<A: Action> Decision<A> {
    /// the only legal action, taken without searching
    pub fn forced(action: A) -> Self {
        let mut policy = vec![0.; A::SPACE];
        policy[action.index()] = 1.;
        Self {
            action,
            visits: vec![0; A::SPACE],
            prior: policy.clone(),
            policy,
            value: 0.,
            simulations: 0,
            rejected: 0,
        }
    }

    /// Pick from the visit distribution sharpened by `1 / temperature`.
    /// Counts are scaled by the largest one first, so the weights stay in
    /// `[0, 1]` at any temperature. Falls back to the chosen action when
    /// nothing was visited.
    pub fn sample(&self, temperature: Entropy, rng: &mut rand::rngs::SmallRng) -> A {
        use rand::distr::Distribution;
        use rand::distr::weighted::WeightedIndex;
        let most = self.visits.iter().copied().max().unwrap_or(0);
        if most == 0 {
            return self.action;
        }
        let weights = self
            .visits
            .iter()
            .map(|&n| (n as f32 / most as f32).powf(1. / temperature.max(1e-3)))
            .collect::<Vec<f32>>();
        match WeightedIndex::new(&weights) {
            Ok(dist) => A::from_index(dist.sample(rng)).unwrap_or(self.action),
            Err(e) => {
                log::warn!("visit sampling failed ({}), playing {}", e, self.action.index());
                self.action
            }
        }
    }
}

impl<A: Action + std::fmt::Display> std::fmt::Display for Decision<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} after {} simulations ({} rejected), value {:+.3}",
            self.action, self.simulations, self.rejected, self.value
        )
    }
}
