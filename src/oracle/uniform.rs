use super::*;
use crate::*;

/// Equal priors over legal actions and a neutral value.
/// Lets search and self-play run without any trained parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl Oracle for Uniform {
    fn evaluate(&self, _: &[f32], legal: &[usize]) -> Result<Evaluation> {
        let p = 1. / legal.len().max(1) as Probability;
        Ok(Evaluation {
            policy: legal.iter().map(|&i| (i, p)).collect(),
            value: 0.,
        })
    }
}
