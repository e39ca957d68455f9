use super::*;
use crate::game::*;
use crate::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// What the acting player knows about a Skirmish table.
///
/// Decklists, everything played, the score and the move history are public.
/// Hidden are the opponent's hand and the order of both decks; only their
/// sizes are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct View {
    pub(super) seat: Seat,
    pub(super) lists: [Hand; 2],
    pub(super) hand: Hand,
    pub(super) played: [Hand; 2],
    pub(super) led: Option<Card>,
    pub(super) leader: Seat,
    pub(super) points: [u8; 2],
    pub(super) held: [usize; 2],
    pub(super) stock: [usize; 2],
    pub(super) history: Vec<(Seat, Move)>,
}

impl View {
    pub fn hand(&self) -> &Hand {
        &self.hand
    }
    /// cards of `seat` that are neither played nor in our own hand
    fn unseen(&self, seat: Seat) -> Option<Hand> {
        let i = seat.index();
        let rest = self.lists[i].minus(&self.played[i])?;
        match seat == self.seat {
            true => rest.minus(&self.hand),
            false => Some(rest),
        }
    }
}

impl Info for View {
    type A = Move;
    type G = Skirmish;

    fn seat(&self) -> Seat {
        self.seat
    }

    fn choices(&self) -> Vec<Move> {
        match self.led.is_none() && self.held.iter().all(|&n| n == 0) {
            true => vec![],
            false => Skirmish::choices(&self.hand, self.led.is_some()),
        }
    }

    fn determinize(&self, rng: &mut SmallRng) -> Option<Skirmish> {
        let me = self.seat;
        let op = me.other();
        let (m, o) = (me.index(), op.index());
        if self.hand.len() != self.held[m] {
            return None;
        }
        let mut mine = self.unseen(me)?.cards().collect::<Vec<Card>>();
        let mut theirs = self.unseen(op)?.cards().collect::<Vec<Card>>();
        if mine.len() != self.stock[m] || theirs.len() != self.held[o] + self.stock[o] {
            return None;
        }
        mine.shuffle(rng);
        theirs.shuffle(rng);
        let deck = theirs.split_off(self.held[o]);
        let mut hands = [Hand::default(); 2];
        let mut decks = [Vec::new(), Vec::new()];
        hands[m] = self.hand;
        hands[o] = theirs.into_iter().collect();
        decks[m] = mine;
        decks[o] = deck;
        Some(Skirmish {
            lists: self.lists,
            hands,
            decks,
            played: self.played,
            led: self.led,
            leader: self.leader,
            points: self.points,
            history: self.history.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn midgame() -> Skirmish {
        let ref mut rng = SmallRng::seed_from_u64(11);
        let a = Deck::try_from("1 2 3 4 5 6 7 8").unwrap();
        let b = Deck::try_from("1 1 2 2 3 3 8 8").unwrap();
        let mut game = Skirmish::initialize(&a, &b, rng).unwrap();
        for _ in 0..3 {
            let legal = game.legal();
            game = game.apply(legal[legal.len() / 2]);
        }
        game
    }

    #[test]
    fn determinization_is_consistent() {
        let game = midgame();
        let view = game.info();
        let ref mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..32 {
            let sample = view.determinize(rng).expect("consistent view");
            assert_eq!(sample.info(), view);
            assert_eq!(sample.encode(), game.encode());
            assert_eq!(sample.legal(), view.choices());
            assert_eq!(sample.seat(), game.seat());
        }
    }

    #[test]
    fn determinization_hides_opponent() {
        let game = midgame();
        let view = game.info();
        let op = view.seat().other();
        let ref mut rng = SmallRng::seed_from_u64(1);
        let hands = (0..64)
            .filter_map(|_| view.determinize(rng))
            .map(|s| *s.hand(op))
            .collect::<std::collections::HashSet<Hand>>();
        assert!(hands.len() > 1);
    }

    #[test]
    fn inconsistent_view_is_rejected() {
        let mut view = midgame().info();
        view.held[view.seat().other().index()] += 1;
        let ref mut rng = SmallRng::seed_from_u64(2);
        assert!(view.determinize(rng).is_none());
    }

    #[test]
    fn terminal_view_has_no_choices() {
        let ref mut rng = SmallRng::seed_from_u64(3);
        let a = Deck::try_from("2").unwrap();
        let b = Deck::try_from("5").unwrap();
        let game = Skirmish::initialize(&a, &b, rng).unwrap();
        let game = game.apply(game.legal()[0]);
        let game = game.apply(game.legal()[0]);
        assert!(game.is_terminal());
        assert!(game.info().choices().is_empty());
    }
}
