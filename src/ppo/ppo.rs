use super::*;
use crate::network::*;
use crate::oracle::*;
use crate::selfplay::*;
use crate::*;
use candle_core::D;
use candle_core::Device;
use candle_core::Tensor;
use candle_nn::AdamW;
use candle_nn::Optimizer;
use candle_nn::ParamsAdamW;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Averages over every minibatch of one update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Report {
    pub samples: usize,
    pub steps: usize,
    pub policy_loss: Utility,
    pub value_loss: Utility,
    pub entropy: Entropy,
    /// mean of `log π_old(a) - log π(a)` over the samples seen
    pub kl: Entropy,
    /// share of samples whose ratio left `[1 - ε, 1 + ε]`
    pub clipped: Probability,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<16}{:<16}{:<16}{:<16}{:<16}{:<16}",
            format!("samples {}", self.samples),
            format!("π {:+.4}", self.policy_loss),
            format!("v {:.4}", self.value_loss),
            format!("H {:.3}", self.entropy),
            format!("KL {:+.4}", self.kl),
            format!("clip {:.2}", self.clipped),
        )
    }
}

/// Clipped-surrogate trainer for the policy-value network.
///
/// `update` trains a fork of the snapshot's parameters and only publishes
/// it once every minibatch went through, so a numeric fault leaves both the
/// published snapshot and the trainer exactly as they were. Optimizer
/// moments start from zero on every update: a batch whose policy gradient
/// vanishes leaves the policy tower where it was.
pub struct Ppo {
    config: PpoConfig,
    rng: SmallRng,
}

impl Ppo {
    pub fn new(config: PpoConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
        }
    }
    pub fn config(&self) -> &PpoConfig {
        &self.config
    }

    /// Consume one iteration's trajectories and return the next snapshot.
    pub fn update(
        &mut self,
        snapshot: &Snapshot,
        trajectories: Vec<Trajectory>,
    ) -> Result<(Snapshot, Report)> {
        let network = snapshot.network().fork()?;
        let features = network.features();
        let actions = network.actions();
        let ref samples = flatten(trajectories, &self.config, features, actions)?;
        let mut adam = self.optimizer(&network)?;
        let mut rng = self.rng.clone();
        let mut report = Report {
            samples: samples.len(),
            ..Report::default()
        };
        let mut seen = 0;
        let mut order = (0..samples.len()).collect::<Vec<usize>>();
        for _ in 0..self.config.epochs {
            order.shuffle(&mut rng);
            for chunk in order.chunks(self.config.minibatch.max(1)) {
                let minibatch = chunk.iter().map(|&i| &samples[i]).collect::<Vec<_>>();
                let ref batch = Batch::new(&minibatch, features, actions)?;
                let (loss, sums) = self.loss(&network, batch)?;
                self.descend(&network, &mut adam, &loss)?;
                report.policy_loss += sums.policy_loss;
                report.value_loss += sums.value_loss;
                report.entropy += sums.entropy;
                report.kl += sums.kl;
                report.clipped += sums.clipped;
                report.steps += 1;
                seen += chunk.len();
            }
        }
        if seen > 0 {
            let n = seen as f32;
            report.policy_loss /= n;
            report.value_loss /= n;
            report.entropy /= n;
            report.kl /= n;
            report.clipped /= n;
        }
        self.rng = rng;
        log::debug!(
            "ppo update v{} -> v{}: {}",
            snapshot.version(),
            snapshot.version() + 1,
            report
        );
        Ok((snapshot.succeed(network), report))
    }

    fn optimizer(&self, network: &Network) -> Result<AdamW> {
        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            beta1: ADAM_BETA1,
            beta2: ADAM_BETA2,
            eps: ADAM_EPSILON,
            weight_decay: 0.,
        };
        Ok(AdamW::new(network.vars(), params)?)
    }

    /// Mean loss over one minibatch, plus the summed terms for reporting.
    fn loss(&self, network: &Network, batch: &Batch) -> Result<(Tensor, Report)> {
        let ref c = self.config;
        let (logits, values) = network.forward(&batch.xs)?;
        let logp = candle_nn::ops::log_softmax(&(logits + &batch.mask)?, D::Minus1)?;
        let p = logp.exp()?;
        let taken = logp.gather(&batch.taken, 1)?.squeeze(1)?;
        let ratio = (&taken - &batch.old)?.exp()?;
        let bounded = ratio.clamp(1. - c.clip, 1. + c.clip)?;
        let surrogate = (&ratio * &batch.advantage)?.minimum(&(&bounded * &batch.advantage)?)?;
        let entropy = (&p * &logp)?.mul(&batch.legal)?.sum(1)?.neg()?;
        let distill = (&batch.target * &logp)?.sum(1)?.neg()?;
        let policy = surrogate
            .neg()?
            .sub(&entropy.affine(c.entropy_coef as f64, 0.)?)?
            .add(&distill.affine(c.distill_coef as f64, 0.)?)?;
        let value = (&values - &batch.ret)?.sqr()?.affine(0.5, 0.)?;
        let loss = policy
            .add(&value.affine(c.value_coef as f64, 0.)?)?
            .mean_all()?;
        let sums = Report {
            policy_loss: policy.sum_all()?.to_scalar::<f32>()?,
            value_loss: value.sum_all()?.to_scalar::<f32>()?,
            entropy: entropy.sum_all()?.to_scalar::<f32>()?,
            kl: (&batch.old - &taken)?.sum_all()?.to_scalar::<f32>()?,
            clipped: ratio
                .to_vec1::<f32>()?
                .into_iter()
                .filter(|r| (r - 1.).abs() > c.clip)
                .count() as Probability,
            ..Report::default()
        };
        if !sums.policy_loss.is_finite() {
            return Err(Error::Numeric("policy loss"));
        }
        if !sums.value_loss.is_finite() {
            return Err(Error::Numeric("value loss"));
        }
        Ok((loss, sums))
    }

    /// Backpropagate, clip the global gradient norm, and take one optimizer step.
    fn descend(&self, network: &Network, adam: &mut AdamW, loss: &Tensor) -> Result<()> {
        let mut grads = loss.backward()?;
        let vars = network.vars();
        let mut sumsq = 0f32;
        for var in vars.iter() {
            if let Some(grad) = grads.get(var.as_tensor()) {
                sumsq += grad.sqr()?.sum_all()?.to_scalar::<f32>()?;
            }
        }
        let norm = sumsq.sqrt();
        if !norm.is_finite() {
            return Err(Error::Numeric("gradient"));
        }
        if norm > self.config.max_grad_norm {
            let scale = (self.config.max_grad_norm / norm) as f64;
            for var in vars.iter() {
                if let Some(grad) = grads.remove(var.as_tensor()) {
                    grads.insert(var.as_tensor(), grad.affine(scale, 0.)?);
                }
            }
        }
        adam.step(&grads)?;
        match network.sumsq()?.is_finite() {
            true => Ok(()),
            false => Err(Error::Numeric("parameters")),
        }
    }
}

/// One minibatch as tensors over the dense action space.
struct Batch {
    xs: Tensor,
    /// zero on legal actions, `MASKED_LOGIT` elsewhere
    mask: Tensor,
    /// one on legal actions, zero elsewhere
    legal: Tensor,
    target: Tensor,
    taken: Tensor,
    old: Tensor,
    advantage: Tensor,
    ret: Tensor,
}

impl Batch {
    fn new(samples: &[&Sample], features: usize, actions: usize) -> Result<Self> {
        let n = samples.len();
        let ref device = Device::Cpu;
        let mut mask = vec![MASKED_LOGIT; n * actions];
        let mut legal = vec![0f32; n * actions];
        for (row, sample) in samples.iter().enumerate() {
            for &i in sample.legal.iter() {
                mask[row * actions + i] = 0.;
                legal[row * actions + i] = 1.;
            }
        }
        let column = |f: fn(&Sample) -> f32| {
            Tensor::from_vec(samples.iter().map(|s| f(s)).collect::<Vec<f32>>(), n, device)
        };
        let xs = samples
            .iter()
            .flat_map(|s| s.encoding.iter().copied())
            .collect::<Vec<f32>>();
        let target = samples
            .iter()
            .flat_map(|s| s.target.iter().copied())
            .collect::<Vec<f32>>();
        let taken = samples
            .iter()
            .map(|s| s.action as u32)
            .collect::<Vec<u32>>();
        Ok(Self {
            xs: Tensor::from_vec(xs, (n, features), device)?,
            mask: Tensor::from_vec(mask, (n, actions), device)?,
            legal: Tensor::from_vec(legal, (n, actions), device)?,
            target: Tensor::from_vec(target, (n, actions), device)?,
            taken: Tensor::from_vec(taken, (n, 1), device)?,
            old: column(|s| s.prior.max(PROBABILITY_MIN).ln())?,
            advantage: column(|s| s.advantage)?,
            ret: column(|s| s.ret)?,
        })
    }
}
