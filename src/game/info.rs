use super::*;
use rand::rngs::SmallRng;

/// An information set: the equivalence class of states that the acting
/// player cannot tell apart.
///
/// Two states in the same information set must offer the acting player the
/// same legal moves, so `choices` is answerable without a concrete state.
/// Implementations are the canonical key of a search node, hence `Hash + Eq`.
pub trait Info: Clone + PartialEq + Eq + Send + Sync + std::hash::Hash + std::fmt::Debug {
    type A: Action;
    type G: Game<A = Self::A>;

    /// the player whose view this is
    fn seat(&self) -> Seat;
    /// moves available to `seat()` in every consistent state
    fn choices(&self) -> Vec<Self::A>;
    /// sample one concrete state consistent with this view, with hidden
    /// information filled in uniformly at random. None when the draw turned
    /// out inconsistent and should be resampled.
    fn determinize(&self, rng: &mut SmallRng) -> Option<Self::G>;
}
