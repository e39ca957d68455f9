use crate::selfplay::Reward;
use crate::*;

/// Hyperparameters of one PPO update.
#[derive(Debug, Clone, PartialEq)]
pub struct PpoConfig {
    pub epochs: usize,
    pub minibatch: usize,
    /// surrogate ratio clip ε
    pub clip: Probability,
    pub value_coef: Utility,
    pub entropy_coef: Entropy,
    /// weight of the cross-entropy toward the search visit targets
    pub distill_coef: Utility,
    /// GAE λ; 1.0 means plain return minus value
    pub lambda: Utility,
    /// standardize advantages per batch
    pub normalize: bool,
    pub learning_rate: f64,
    pub max_grad_norm: f32,
    pub seed: u64,
    pub reward: Reward,
}

impl Default for PpoConfig {
    fn default() -> Self {
        Self {
            epochs: PPO_EPOCHS,
            minibatch: PPO_MINIBATCH,
            clip: PPO_CLIP,
            value_coef: PPO_VALUE_COEF,
            entropy_coef: PPO_ENTROPY_COEF,
            distill_coef: PPO_DISTILL_COEF,
            lambda: GAE_LAMBDA,
            normalize: false,
            learning_rate: LEARNING_RATE,
            max_grad_norm: MAX_GRAD_NORM,
            seed: PPO_SEED,
            reward: Reward::default(),
        }
    }
}
