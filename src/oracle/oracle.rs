use crate::*;

/// Output of one oracle query.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// (dense action index, probability) for every legal action, in the
    /// order the legal indices were given
    pub policy: Vec<(usize, Probability)>,
    /// expected outcome for the acting player, in `[-1, 1]`
    pub value: Utility,
}

impl Evaluation {
    pub fn prior(&self, index: usize) -> Option<Probability> {
        self.policy
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, p)| *p)
    }
}

/// A policy-value function over encoded states.
///
/// Implementations are shared read-only across search workers, hence
/// `Send + Sync` and `&self`. Failures propagate to whoever asked; the
/// search never substitutes a fallback value.
pub trait Oracle: Send + Sync {
    fn evaluate(&self, encoding: &[f32], legal: &[usize]) -> Result<Evaluation>;
}

impl<O: Oracle + ?Sized> Oracle for std::sync::Arc<O> {
    fn evaluate(&self, encoding: &[f32], legal: &[usize]) -> Result<Evaluation> {
        self.as_ref().evaluate(encoding, legal)
    }
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn evaluate(&self, encoding: &[f32], legal: &[usize]) -> Result<Evaluation> {
        (**self).evaluate(encoding, legal)
    }
}
