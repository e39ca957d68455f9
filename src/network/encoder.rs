use super::*;
use candle_core::D;
use candle_core::Module;
use candle_core::Tensor;
use candle_nn::Linear;
use candle_nn::VarBuilder;

/// State encoder: two linear layers, each followed by layer norm and ReLU.
#[derive(Debug, Clone)]
pub struct Encoder {
    fc1: Linear,
    ln1: Norm,
    fc2: Linear,
    ln2: Norm,
}

impl Encoder {
    pub fn new(
        inputs: usize,
        hidden: usize,
        embed: usize,
        vb: VarBuilder,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            fc1: candle_nn::linear(inputs, hidden, vb.pp("fc1"))?,
            ln1: Norm::new(hidden, vb.pp("ln1"))?,
            fc2: candle_nn::linear(hidden, embed, vb.pp("fc2"))?,
            ln2: Norm::new(embed, vb.pp("ln2"))?,
        })
    }
}

impl Module for Encoder {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.ln1.forward(&self.fc1.forward(xs)?)?.relu()?;
        self.ln2.forward(&self.fc2.forward(&xs)?)?.relu()
    }
}

/// Value head: a ReLU layer and a single `tanh` unit, one value per row.
#[derive(Debug, Clone)]
pub struct Critic {
    fc1: Linear,
    fc2: Linear,
}

impl Critic {
    pub fn new(embed: usize, hidden: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            fc1: candle_nn::linear(embed, hidden, vb.pp("fc1"))?,
            fc2: candle_nn::linear(hidden, 1, vb.pp("fc2"))?,
        })
    }
}

impl Module for Critic {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.fc1.forward(xs)?.relu()?;
        self.fc2.forward(&xs)?.tanh()?.squeeze(D::Minus1)
    }
}
