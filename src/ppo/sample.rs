use super::*;
use crate::selfplay::*;
use crate::*;

/// One flattened training example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub encoding: Vec<f32>,
    pub legal: Vec<usize>,
    /// dense index of the taken action
    pub action: usize,
    /// behaviour probability of the taken action
    pub prior: Probability,
    /// visit-count target over the dense action space, zero outside `legal`
    pub target: Vec<Probability>,
    pub advantage: Utility,
    pub ret: Utility,
}

/// Generalized advantage estimates and returns for one trajectory.
/// Bootstraps from zero past the last step.
pub fn advantages(steps: &[Step], gamma: Utility, lambda: Utility) -> Vec<(Utility, Utility)> {
    let mut next = 0.;
    let mut gae = 0.;
    let mut out = steps
        .iter()
        .rev()
        .map(|step| {
            let delta = step.reward + gamma * next - step.value;
            gae = delta + gamma * lambda * gae;
            next = step.value;
            (gae, gae + step.value)
        })
        .collect::<Vec<_>>();
    out.reverse();
    out
}

/// Consume trajectories into a flat batch, validating every shape
/// against the network being trained.
pub fn flatten(
    trajectories: Vec<Trajectory>,
    config: &PpoConfig,
    features: usize,
    actions: usize,
) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for trajectory in trajectories {
        let estimates = advantages(trajectory.steps(), config.reward.gamma, config.lambda);
        for (step, (advantage, ret)) in trajectory.into_steps().into_iter().zip(estimates) {
            if step.encoding.len() != features {
                return Err(Error::shape("encoding", features, step.encoding.len()));
            }
            if step.target.len() != actions {
                return Err(Error::shape("visit target", actions, step.target.len()));
            }
            if let Some(&i) = step.legal.iter().find(|&&i| i >= actions) {
                return Err(Error::shape("action index", actions, i));
            }
            if !step.legal.contains(&step.action) {
                return Err(Error::shape("taken action", actions, step.action));
            }
            samples.push(Sample {
                target: (0..actions)
                    .map(|i| match step.legal.contains(&i) {
                        true => step.target[i],
                        false => 0.,
                    })
                    .collect(),
                encoding: step.encoding,
                legal: step.legal,
                action: step.action,
                prior: step.prior,
                advantage,
                ret,
            });
        }
    }
    if config.normalize && samples.len() > 1 {
        let n = samples.len() as Utility;
        let mean = samples.iter().map(|s| s.advantage).sum::<Utility>() / n;
        let var = samples
            .iter()
            .map(|s| (s.advantage - mean).powi(2))
            .sum::<Utility>()
            / n;
        let std = var.sqrt().max(1e-6);
        samples
            .iter_mut()
            .for_each(|s| s.advantage = (s.advantage - mean) / std);
    }
    Ok(samples)
}
