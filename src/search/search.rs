use super::*;
use crate::game::*;
use crate::oracle::*;
use crate::*;
use rand::rngs::SmallRng;

/// Where a simulation stopped.
enum Leaf<G: Game> {
    /// the game ended, or the player to move has nothing to play
    Terminal(G),
    /// freshly expanded node, valued by the oracle for `seat`
    Estimate(Seat, Utility),
}

impl<G: Game> Leaf<G> {
    fn value(&self, seat: Seat) -> Utility {
        match self {
            Self::Terminal(state) => state.outcome(seat),
            Self::Estimate(who, value) if *who == seat => *value,
            Self::Estimate(_, value) => -value,
        }
    }
}

/// Information-set Monte Carlo tree search.
///
/// Every simulation samples a fresh determinization of the root
/// information set, descends the shared tree by PUCT over the actions
/// legal in that determinization, expands the first node whose legal set
/// is not yet covered using one oracle query, and backs the leaf value up
/// the path with the sign flipped for the opposing seat.
pub struct Search<'a, G: Game, O: Oracle> {
    oracle: &'a O,
    config: &'a SearchConfig,
    tree: Tree<G>,
    rng: SmallRng,
    rejected: usize,
}

impl<'a, G: Game, O: Oracle> Search<'a, G, O> {
    pub fn new(oracle: &'a O, config: &'a SearchConfig, info: &G::I) -> Self {
        Self {
            oracle,
            config,
            tree: Tree::default(),
            rng: config.rng(info),
            rejected: 0,
        }
    }

    /// Run `budget` simulations from `info` and choose an action.
    pub fn run(mut self, info: &G::I, budget: usize) -> Result<Decision<G::A>> {
        let choices = info.choices();
        if let [only] = choices.as_slice() {
            return Ok(Decision::forced(*only));
        }
        let ref root = Key::new(info.clone(), Vec::new());
        let ref state = self.sample(info)?;
        let ref legal = state.legal();
        let evaluation = self.expand(state, root.clone(), legal)?;
        for _ in 0..budget {
            let state = self.sample(info)?;
            self.simulate(state)?;
        }
        log::trace!(
            "searched {} simulations, {} nodes, {} rejected",
            budget,
            self.tree.len(),
            self.rejected
        );
        let retries = self.config.retries;
        let node = self.tree.get(root).ok_or(Error::Determinization(retries))?;
        let action = node.best().ok_or(Error::Determinization(retries))?;
        let mut visits = vec![0; G::A::SPACE];
        let mut prior = vec![0.; G::A::SPACE];
        for (a, stats) in node.edges() {
            visits[a.index()] = stats.visits;
            prior[a.index()] = stats.prior;
        }
        let total = visits.iter().sum::<usize>();
        let policy = match total {
            0 => prior.clone(),
            n => visits.iter().map(|&v| v as Probability / n as Probability).collect(),
        };
        Ok(Decision {
            action,
            visits,
            policy,
            prior,
            value: evaluation.value,
            simulations: budget,
            rejected: self.rejected,
        })
    }

    /// Draw a determinization the player to move can act in.
    fn sample(&mut self, info: &G::I) -> Result<G> {
        for _ in 0..self.config.retries {
            match info.determinize(&mut self.rng) {
                Some(state) if !state.is_terminal() && !state.legal().is_empty() => {
                    return Ok(state);
                }
                _ => self.rejected += 1,
            }
        }
        Err(Error::Determinization(self.config.retries))
    }

    /// Query the oracle at `state` and grow the node at `key` to cover `legal`.
    fn expand(&mut self, state: &G, key: Key<G::I, G::A>, legal: &[G::A]) -> Result<Evaluation> {
        let ref indices = legal.iter().map(Action::index).collect::<Vec<usize>>();
        let evaluation = self.oracle.evaluate(&state.encode(), indices)?;
        self.tree.expand(key, state.seat(), legal, |a| {
            evaluation.prior(a.index()).unwrap_or(0.)
        });
        Ok(evaluation)
    }

    fn simulate(&mut self, root: G) -> Result<()> {
        let mut state = root;
        let mut history = Vec::new();
        let mut path = Vec::new();
        let leaf = loop {
            let legal = state.legal();
            if state.is_terminal() || legal.is_empty() {
                break Leaf::Terminal(state);
            }
            let key = Key::new(state.info(), history.clone());
            match self.tree.select(&key, &legal, self.config.c_puct) {
                Some(action) => {
                    path.push((key, action, state.seat()));
                    history.push(action);
                    state = state.apply(action);
                }
                None => {
                    let evaluation = self.expand(&state, key, &legal)?;
                    break Leaf::Estimate(state.seat(), evaluation.value);
                }
            }
        };
        for (ref key, ref action, seat) in path {
            self.tree.update(key, action, leaf.value(seat));
        }
        Ok(())
    }
}

/// Choose an action for the player to move at `info`.
pub fn select_action<G, O>(
    oracle: &O,
    config: &SearchConfig,
    info: &G::I,
    budget: usize,
) -> Result<Decision<G::A>>
where
    G: Game,
    O: Oracle,
{
    Search::<G, O>::new(oracle, config, info).run(info, budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skirmish::*;
    use rand::Rng;
    use rand::SeedableRng;

    /// Sequential matching pennies: P1's coin is hidden from P2.
    /// A flaky variant rejects half of its determinizations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Coin {
        Heads,
        Tails,
    }

    impl Action for Coin {
        const SPACE: usize = 2;
        fn index(&self) -> usize {
            *self as usize
        }
        fn from_index(index: usize) -> Option<Self> {
            match index {
                0 => Some(Self::Heads),
                1 => Some(Self::Tails),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Pennies {
        moves: Vec<Coin>,
        flaky: bool,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Blind {
        depth: usize,
        flaky: bool,
    }

    impl Game for Pennies {
        type A = Coin;
        type I = Blind;
        type D = bool;
        const FEATURES: usize = 1;
        fn initialize(flaky: &bool, _: &bool, _: &mut SmallRng) -> Result<Self> {
            Ok(Self {
                moves: vec![],
                flaky: *flaky,
            })
        }
        fn seat(&self) -> Seat {
            Seat::from(self.moves.len())
        }
        fn is_terminal(&self) -> bool {
            self.moves.len() == 2
        }
        fn legal(&self) -> Vec<Coin> {
            match self.is_terminal() {
                true => vec![],
                false => vec![Coin::Heads, Coin::Tails],
            }
        }
        fn apply(&self, action: Coin) -> Self {
            let mut next = self.clone();
            next.moves.push(action);
            next
        }
        fn outcome(&self, seat: Seat) -> Utility {
            let matched = match self.moves.as_slice() {
                [a, b] if a == b => 1.,
                [_, _] => -1.,
                _ => 0.,
            };
            match seat {
                Seat::P1 => matched,
                Seat::P2 => -matched,
            }
        }
        fn encode(&self) -> Vec<f32> {
            vec![self.moves.len() as f32]
        }
        fn info(&self) -> Blind {
            Blind {
                depth: self.moves.len(),
                flaky: self.flaky,
            }
        }
    }

    impl Info for Blind {
        type A = Coin;
        type G = Pennies;
        fn seat(&self) -> Seat {
            Seat::from(self.depth)
        }
        fn choices(&self) -> Vec<Coin> {
            match self.depth {
                0 | 1 => vec![Coin::Heads, Coin::Tails],
                _ => vec![],
            }
        }
        fn determinize(&self, rng: &mut SmallRng) -> Option<Pennies> {
            if self.flaky && rng.random_bool(0.5) {
                return None;
            }
            Some(Pennies {
                moves: (0..self.depth)
                    .map(|_| match rng.random_bool(0.5) {
                        true => Coin::Heads,
                        false => Coin::Tails,
                    })
                    .collect(),
                flaky: self.flaky,
            })
        }
    }

    struct Offline;
    impl Oracle for Offline {
        fn evaluate(&self, _: &[f32], _: &[usize]) -> Result<Evaluation> {
            Err(Error::Oracle("offline".into()))
        }
    }

    fn card(power: u8) -> Card {
        Card::try_from(power - 1).unwrap()
    }

    fn deal(a: &str, b: &str, seed: u64) -> Skirmish {
        let ref mut rng = SmallRng::seed_from_u64(seed);
        let a = Deck::try_from(a).unwrap();
        let b = Deck::try_from(b).unwrap();
        Skirmish::initialize(&a, &b, rng).unwrap()
    }

    #[test]
    fn single_legal_action_skips_search() {
        let game = deal("4", "2 7", 0);
        let ref config = SearchConfig::default();
        let decision = select_action::<Skirmish, _>(&Offline, config, &game.info(), 100).unwrap();
        assert_eq!(decision.action, Move::Play(card(4)));
        assert_eq!(decision.simulations, 0);
        assert_eq!(decision.policy[card(4).kind()], 1.);
    }

    #[test]
    fn root_visits_sum_to_budget() {
        let game = deal("1 2 3 4 5 6 7 8", "8 7 6 5 4 3 2 1", 3);
        let ref config = SearchConfig::default();
        let ref info = game.info();
        for budget in [1, 7, 40] {
            let decision = select_action::<Skirmish, _>(&Uniform, config, info, budget).unwrap();
            assert_eq!(decision.visits.iter().sum::<usize>(), budget);
            assert_eq!(decision.simulations, budget);
            assert!((decision.policy.iter().sum::<f32>() - 1.).abs() < 1e-5);
            assert!(game.legal().contains(&decision.action));
        }
    }

    #[test]
    fn rejected_determinizations_are_not_simulations() {
        let game = Pennies::initialize(&true, &true, &mut SmallRng::seed_from_u64(0))
            .unwrap()
            .apply(Coin::Tails);
        let ref config = SearchConfig::default();
        let decision = select_action::<Pennies, _>(&Uniform, config, &game.info(), 50).unwrap();
        assert!(decision.rejected > 0);
        assert_eq!(decision.visits.iter().sum::<usize>(), 50);
    }

    #[test]
    fn exhausted_retries_are_fatal() {
        let game = Pennies::initialize(&false, &false, &mut SmallRng::seed_from_u64(0))
            .unwrap()
            .apply(Coin::Heads)
            .apply(Coin::Heads);
        let ref config = SearchConfig::default();
        let error = select_action::<Pennies, _>(&Uniform, config, &game.info(), 8).unwrap_err();
        assert!(matches!(error, Error::Determinization(DETERMINIZATION_RETRIES)));
        assert!(error.is_config());
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let game = deal("1 2 3 4 5 6 7 8", "2 2 4 4 6 6 8 8", 5);
        let game = game.apply(game.legal()[1]);
        let snapshot = Snapshot::initial(Skirmish::FEATURES, Move::SPACE, 17).unwrap();
        let ref config = SearchConfig::default().with_seed(99);
        let a = select_action::<Skirmish, _>(&snapshot, config, &game.info(), 30).unwrap();
        let b = select_action::<Skirmish, _>(&snapshot, config, &game.info(), 30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oracle_failure_propagates() {
        let game = deal("1 2 3", "4 5 6", 1);
        let ref config = SearchConfig::default();
        let result = select_action::<Skirmish, _>(&Offline, config, &game.info(), 4);
        assert!(matches!(result, Err(Error::Oracle(_))));
    }

    #[test]
    fn finds_the_winning_reply() {
        // P1 leads its only card; P2 wins everything by answering 6, loses by answering 3
        let game = deal("5", "3 6", 0).apply(Move::Play(card(5)));
        let ref config = SearchConfig::default();
        let decision = select_action::<Skirmish, _>(&Uniform, config, &game.info(), 32).unwrap();
        assert_eq!(decision.action, Move::Play(card(6)));
    }
}
