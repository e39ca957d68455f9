use crate::game::*;
use crate::*;
use std::collections::BTreeMap;

/// Statistics of one action out of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub visits: usize,
    pub total: Utility,
    pub prior: Probability,
}

impl Stats {
    pub fn new(prior: Probability) -> Self {
        Self {
            prior,
            ..Self::default()
        }
    }
    /// running mean of backed-up values; zero before the first visit
    pub fn mean(&self) -> Utility {
        match self.visits {
            0 => 0.,
            n => self.total / n as Utility,
        }
    }
}

/// One information-set node shared by every determinization that reaches it.
///
/// Children are keyed by action, never by position, because the legal set
/// seen through the node can grow as new determinizations pass through.
#[derive(Debug, Clone)]
pub struct Node<A: Action> {
    seat: Seat,
    visits: usize,
    edges: BTreeMap<A, Stats>,
}

impl<A: Action> Node<A> {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            visits: 0,
            edges: BTreeMap::new(),
        }
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn visits(&self) -> usize {
        self.visits
    }
    pub fn edges(&self) -> impl Iterator<Item = (&A, &Stats)> {
        self.edges.iter()
    }
    pub fn stats(&self, action: &A) -> Option<&Stats> {
        self.edges.get(action)
    }
    /// whether every action in `legal` already has statistics here
    pub fn covers(&self, legal: &[A]) -> bool {
        legal.iter().all(|a| self.edges.contains_key(a))
    }

    /// Add zero-visit statistics for legal actions not seen before.
    /// Counts as one pass through the node.
    pub fn expand(&mut self, legal: &[A], prior: impl Fn(&A) -> Probability) {
        self.visits += 1;
        for action in legal {
            self.edges
                .entry(*action)
                .or_insert_with(|| Stats::new(prior(action)));
        }
    }

    /// `Q(a) + c · P(a) · √N / (1 + N(a))` over the given actions.
    /// Ties break toward the lowest dense index.
    pub fn select(&self, legal: &[A], c_puct: Utility) -> Option<A> {
        let sqrt = (self.visits as Utility).sqrt();
        let mut candidates = legal
            .iter()
            .filter_map(|a| self.edges.get(a).map(|s| (*a, s)))
            .collect::<Vec<_>>();
        candidates.sort_by_key(|(a, _)| a.index());
        candidates
            .into_iter()
            .map(|(a, s)| (a, s.mean() + c_puct * s.prior * sqrt / (1 + s.visits) as Utility))
            .fold(None, |best: Option<(A, Utility)>, (a, score)| match best {
                Some((_, top)) if score <= top => best,
                _ => Some((a, score)),
            })
            .map(|(a, _)| a)
    }

    /// record one backed-up value, seen from this node's seat, through `action`
    pub fn update(&mut self, action: &A, value: Utility) {
        self.visits += 1;
        if let Some(stats) = self.edges.get_mut(action) {
            stats.visits += 1;
            stats.total += value;
        }
    }

    /// most visited action; ties go to the higher mean, then the lowest index
    pub fn best(&self) -> Option<A> {
        let mut candidates = self.edges.iter().collect::<Vec<_>>();
        candidates.sort_by_key(|(a, _)| a.index());
        candidates
            .into_iter()
            .fold(None, |best: Option<(&A, &Stats)>, (a, s)| match best {
                Some((_, top))
                    if s.visits < top.visits
                        || (s.visits == top.visits && s.mean() <= top.mean()) =>
                {
                    best
                }
                _ => Some((a, s)),
            })
            .map(|(a, _)| *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skirmish::*;

    fn play(k: u8) -> Move {
        Move::Play(Card::try_from(k).unwrap())
    }

    #[test]
    fn priors_guide_the_first_selection() {
        let mut node = Node::new(Seat::P1);
        let legal = [play(0), play(1), play(2)];
        node.expand(&legal, |a| if *a == play(1) { 0.8 } else { 0.1 });
        assert_eq!(node.select(&legal, C_PUCT), Some(play(1)));
    }

    #[test]
    fn selection_ties_go_to_lowest_index() {
        let mut node = Node::new(Seat::P1);
        let legal = [play(2), play(0), Move::Pass];
        node.expand(&legal, |_| 1. / 3.);
        assert_eq!(node.select(&legal, C_PUCT), Some(play(0)));
    }

    #[test]
    fn selection_respects_the_current_legal_set() {
        let mut node = Node::new(Seat::P2);
        node.expand(&[play(0), play(1)], |a| if *a == play(0) { 0.9 } else { 0.1 });
        assert_eq!(node.select(&[play(1)], C_PUCT), Some(play(1)));
        assert!(!node.covers(&[play(1), Move::Pass]));
    }

    #[test]
    fn best_prefers_visits_then_mean_then_index() {
        let mut node = Node::new(Seat::P1);
        let legal = [play(0), play(1), play(2)];
        node.expand(&legal, |_| 1. / 3.);
        node.update(&play(2), 0.5);
        node.update(&play(2), 0.5);
        node.update(&play(1), 1.0);
        node.update(&play(1), -1.0);
        assert_eq!(node.best(), Some(play(2)));
        node.update(&play(1), 1.0);
        node.update(&play(2), -1.0);
        assert_eq!(node.best(), Some(play(1)));
        let mut even = Node::new(Seat::P1);
        even.expand(&legal, |_| 1. / 3.);
        assert_eq!(even.best(), Some(play(0)));
    }
}
