use super::*;
use crate::game::*;
use std::collections::HashMap;

/// Identity of a search node: what the acting player knows, plus the
/// actions taken since the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key<I, A> {
    info: I,
    history: Vec<A>,
}

impl<I, A> Key<I, A> {
    pub fn new(info: I, history: Vec<A>) -> Self {
        Self { info, history }
    }
}

/// The information-set tree of one search call. Private to that call.
#[derive(Debug)]
pub struct Tree<G: Game>(HashMap<Key<G::I, G::A>, Node<G::A>>);

impl<G: Game> Default for Tree<G> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<G: Game> Tree<G> {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn get(&self, key: &Key<G::I, G::A>) -> Option<&Node<G::A>> {
        self.0.get(key)
    }
    /// PUCT choice at `key`, or None when the node is missing or has
    /// not been expanded for every action in `legal`
    pub fn select(&self, key: &Key<G::I, G::A>, legal: &[G::A], c_puct: f32) -> Option<G::A> {
        self.0
            .get(key)
            .filter(|node| node.covers(legal))
            .and_then(|node| node.select(legal, c_puct))
    }
    pub fn expand(
        &mut self,
        key: Key<G::I, G::A>,
        seat: Seat,
        legal: &[G::A],
        prior: impl Fn(&G::A) -> f32,
    ) {
        self.0
            .entry(key)
            .or_insert_with(|| Node::new(seat))
            .expand(legal, prior);
    }
    pub fn update(&mut self, key: &Key<G::I, G::A>, action: &G::A, value: f32) {
        if let Some(node) = self.0.get_mut(key) {
            node.update(action, value);
        }
    }
}
