use crate::search::*;
use crate::*;

/// Settings for generating self-play games.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig<D> {
    pub search: SearchConfig,
    /// simulations per decision
    pub budget: usize,
    /// visit-count temperature while exploring
    pub temperature: Entropy,
    /// opening moves sampled from visits instead of taken greedily
    pub exploration_moves: usize,
    /// moves after which the game is scored as it stands
    pub max_moves: usize,
    /// deck configurations for P1 and P2
    pub decks: (D, D),
}

impl<D> SelfPlayConfig<D> {
    pub fn new(a: D, b: D) -> Self {
        Self {
            search: SearchConfig::default(),
            budget: SEARCH_BUDGET,
            temperature: TEMPERATURE,
            exploration_moves: EXPLORATION_MOVES,
            max_moves: MAX_MOVES,
            decks: (a, b),
        }
    }
    pub fn with_budget(self, budget: usize) -> Self {
        Self { budget, ..self }
    }
}
