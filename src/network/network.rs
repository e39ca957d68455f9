use super::*;
use crate::oracle::*;
use crate::*;
use candle_core::DType;
use candle_core::Device;
use candle_core::Module;
use candle_core::Tensor;
use candle_core::Var;
use candle_nn::Linear;
use candle_nn::VarBuilder;
use candle_nn::VarMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;

/// Policy-value network.
///
/// Two independent towers read the same encoding. The policy tower encodes
/// the state and scores every dense action with a linear head. The value
/// tower has its own encoder and ends in a single `tanh` unit. Value
/// regression therefore never moves the policy.
///
/// Parameters live in a [`VarMap`] under dotted names such as
/// `policy.fc1.weight`. Clones share that storage; [`Network::fork`]
/// copies it. Published networks are never trained in place.
#[derive(Clone)]
pub struct Network {
    features: usize,
    actions: usize,
    hidden: usize,
    varmap: VarMap,
    policy: Encoder,
    head: Linear,
    value: Encoder,
    critic: Critic,
}

impl Network {
    /// Glorot-uniform weights and zero biases drawn from `seed`;
    /// norms start as the identity.
    pub fn new(features: usize, actions: usize, hidden: usize, seed: u64) -> Result<Self> {
        let network = Self::build(features, actions, hidden)?;
        let ref mut rng = SmallRng::seed_from_u64(seed);
        for (name, var) in network.params() {
            let values = match var.dims() {
                &[rows, cols] => {
                    let bound = (6. / (rows + cols) as f32).sqrt();
                    (0..rows * cols)
                        .map(|_| rng.random_range(-bound..bound))
                        .collect::<Vec<f32>>()
                }
                _ if name.ends_with(".bias") => vec![0.; var.elem_count()],
                _ => continue,
            };
            var.set(&Tensor::from_vec(values, var.dims(), &Device::Cpu)?)?;
        }
        Ok(network)
    }

    fn build(features: usize, actions: usize, hidden: usize) -> Result<Self> {
        let embed = (hidden / 2).max(1);
        let varmap = VarMap::new();
        let (policy, head, value, critic) = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
            (
                Encoder::new(features, hidden, embed, vb.pp("policy"))?,
                candle_nn::linear(embed, actions, vb.pp("policy").pp("head"))?,
                Encoder::new(features, hidden, embed, vb.pp("value"))?,
                Critic::new(embed, embed, vb.pp("value").pp("head"))?,
            )
        };
        Ok(Self {
            features,
            actions,
            hidden,
            varmap,
            policy,
            head,
            value,
            critic,
        })
    }

    /// A copy with its own parameter storage.
    pub fn fork(&self) -> Result<Self> {
        let copy = Self::build(self.features, self.actions, self.hidden)?;
        copy.import(&self.export()?)?;
        Ok(copy)
    }

    pub fn features(&self) -> usize {
        self.features
    }
    pub fn actions(&self) -> usize {
        self.actions
    }
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Check that the network fits a game with the given encoding width
    /// and action space.
    pub fn validate(&self, features: usize, actions: usize) -> Result<()> {
        if self.features != features {
            return Err(Error::shape("state size", features, self.features));
        }
        if self.actions != actions {
            return Err(Error::shape("action size", actions, self.actions));
        }
        Ok(())
    }

    /// Batched forward pass over `(rows, features)`.
    /// Returns raw logits `(rows, actions)` and values `(rows,)`.
    pub fn forward(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let logits = self.head.forward(&self.policy.forward(xs)?)?;
        let values = self.critic.forward(&self.value.forward(xs)?)?;
        Ok((logits, values))
    }

    /// Trainable variables, in name order.
    pub fn vars(&self) -> Vec<Var> {
        self.params().into_iter().map(|(_, var)| var).collect()
    }

    /// Every parameter flattened row-major, keyed by name.
    pub fn export(&self) -> Result<BTreeMap<String, Vec<f32>>> {
        self.params()
            .into_iter()
            .map(|(name, var)| Ok((name, var.flatten_all()?.to_vec1::<f32>()?)))
            .collect()
    }

    /// Overwrite every parameter from `values`, which must name each one
    /// exactly once with the right number of elements.
    pub fn import(&self, values: &BTreeMap<String, Vec<f32>>) -> Result<()> {
        let params = self.params();
        if values.len() != params.len() {
            return Err(Error::shape("parameter count", params.len(), values.len()));
        }
        for (name, var) in params {
            let data = values.get(&name).ok_or(Error::Parameter(name))?;
            if data.len() != var.elem_count() {
                return Err(Error::shape("parameter", var.elem_count(), data.len()));
            }
            var.set(&Tensor::from_slice(data.as_slice(), var.dims(), &Device::Cpu)?)?;
        }
        Ok(())
    }

    /// Sum of squared parameters; non-finite once anything overflowed.
    pub fn sumsq(&self) -> Result<f32> {
        self.vars().iter().try_fold(0., |sum, var| -> Result<f32> {
            Ok(sum + var.sqr()?.sum_all()?.to_scalar::<f32>()?)
        })
    }

    fn params(&self) -> Vec<(String, Var)> {
        let data = self
            .varmap
            .data()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut params = data
            .iter()
            .map(|(name, var)| (name.clone(), var.clone()))
            .collect::<Vec<_>>();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        params
    }

    fn check(&self, encoding: &[f32], legal: &[usize]) -> Result<()> {
        if encoding.len() != self.features {
            return Err(Error::shape("encoding", self.features, encoding.len()));
        }
        match legal.iter().find(|&&i| i >= self.actions) {
            Some(&i) => Err(Error::shape("action index", self.actions, i)),
            None => Ok(()),
        }
    }
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        (self.features, self.actions, self.hidden) == (other.features, other.actions, other.hidden)
            && self.export().ok() == other.export().ok()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("features", &self.features)
            .field("actions", &self.actions)
            .field("hidden", &self.hidden)
            .finish()
    }
}

/// Softmax of `logits` restricted to `legal`, aligned with `legal`.
pub fn softmax(logits: &[f32], legal: &[usize]) -> Vec<Probability> {
    let max = legal
        .iter()
        .map(|&i| logits[i])
        .fold(f32::NEG_INFINITY, f32::max);
    let exps = legal
        .iter()
        .map(|&i| (logits[i] - max).exp())
        .collect::<Vec<f32>>();
    let sum = exps.iter().sum::<f32>();
    exps.into_iter().map(|e| e / sum).collect()
}

impl Oracle for Network {
    fn evaluate(&self, encoding: &[f32], legal: &[usize]) -> Result<Evaluation> {
        self.check(encoding, legal)?;
        let xs = Tensor::from_slice(encoding, (1, self.features), &Device::Cpu)?;
        let (logits, values) = self.forward(&xs)?;
        let logits = logits.squeeze(0)?.to_vec1::<f32>()?;
        let value = values.squeeze(0)?.to_scalar::<f32>()?;
        let policy = legal
            .iter()
            .copied()
            .zip(softmax(&logits, legal))
            .collect::<Vec<_>>();
        if !value.is_finite() || policy.iter().any(|(_, p)| !p.is_finite()) {
            return Err(Error::Oracle("network produced a non-finite output".into()));
        }
        Ok(Evaluation { policy, value })
    }
}
