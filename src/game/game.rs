use super::*;
use crate::*;
use rand::rngs::SmallRng;

/// The memoryless game state.
///
/// States are immutable values: `apply` returns a new state and never
/// touches `self`, so any number of search workers can hold the same state.
///
/// # Required Methods
///
/// - `initialize(a, b, rng)` — deal a fresh game from two deck configurations
/// - `seat()` — who acts next
/// - `is_terminal()` — whether the game is over
/// - `legal()` — moves available to `seat()`; empty is a valid answer, not an error
/// - `apply(action)` — successor state
/// - `outcome(seat)` — result for `seat` in `[-1, 1]`; meaningful at terminal
///   states and used as the forced result when no legal move remains
/// - `encode()` — fixed-length observation of the acting player, of length `FEATURES`
/// - `info()` — the acting player's information set
///
/// `encode` must only read what `seat()` can observe: every determinization
/// of one information set encodes identically.
pub trait Game: Clone + Send + Sync + std::fmt::Debug {
    type A: Action;
    type I: Info<A = Self::A, G = Self>;
    /// deck configuration consumed by `initialize`
    type D: Clone + Send + Sync + std::fmt::Debug;
    /// length of every `encode()` vector
    const FEATURES: usize;

    fn initialize(a: &Self::D, b: &Self::D, rng: &mut SmallRng) -> Result<Self>;
    fn seat(&self) -> Seat;
    fn is_terminal(&self) -> bool;
    fn legal(&self) -> Vec<Self::A>;
    fn apply(&self, action: Self::A) -> Self;
    fn outcome(&self, seat: Seat) -> Utility;
    fn encode(&self) -> Vec<f32>;
    fn info(&self) -> Self::I;

    /// dense indices of the legal moves, in legal order
    fn mask(&self) -> Vec<usize> {
        self.legal().iter().map(Action::index).collect()
    }
}
