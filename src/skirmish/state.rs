use super::*;
use crate::game::*;
use crate::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Copies of one kind treated as "a lot" when scaling count features.
const COPIES: f32 = 4.0;

/// Full Skirmish state, hidden information included.
///
/// Play proceeds in tricks. The leader plays a card face up, the follower
/// answers with a card (or passes when empty-handed). The stronger card
/// wins the trick and a point, and its owner leads next; ties score nothing
/// and keep the leader. After every trick both hands refill from their
/// decks. The game ends when both hands are empty. A leader left without
/// cards while the follower still holds some has no legal move, which the
/// self-play loop scores as a forced end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Skirmish {
    pub(super) lists: [Hand; 2],
    pub(super) hands: [Hand; 2],
    pub(super) decks: [Vec<Card>; 2],
    pub(super) played: [Hand; 2],
    pub(super) led: Option<Card>,
    pub(super) leader: Seat,
    pub(super) points: [u8; 2],
    pub(super) history: Vec<(Seat, Move)>,
}

impl Skirmish {
    pub fn points(&self, seat: Seat) -> u8 {
        self.points[seat.index()]
    }
    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }
    pub fn history(&self) -> &[(Seat, Move)] {
        &self.history
    }
    pub fn led(&self) -> Option<Card> {
        self.led
    }
    /// moves available from a hand, whether leading or following
    pub(super) fn choices(hand: &Hand, following: bool) -> Vec<Move> {
        match (hand.is_empty(), following) {
            (true, true) => vec![Move::Pass],
            _ => hand.kinds().map(Move::Play).collect(),
        }
    }
    /// top both hands back up to HAND_SIZE, leader first
    fn refill(&mut self) {
        for seat in [self.leader, self.leader.other()] {
            let i = seat.index();
            while self.hands[i].len() < HAND_SIZE {
                match self.decks[i].pop() {
                    Some(card) => self.hands[i].add(card),
                    None => break,
                }
            }
        }
    }
}

impl Game for Skirmish {
    type A = Move;
    type I = View;
    type D = Deck;
    const FEATURES: usize = 4 * KINDS + 7;

    fn initialize(a: &Deck, b: &Deck, rng: &mut SmallRng) -> Result<Self> {
        let mut decks = [a.cards().to_vec(), b.cards().to_vec()];
        decks.iter_mut().for_each(|d| d.shuffle(rng));
        let mut game = Self {
            lists: [a.composition(), b.composition()],
            hands: [Hand::default(); 2],
            decks,
            played: [Hand::default(); 2],
            led: None,
            leader: Seat::P1,
            points: [0; 2],
            history: Vec::new(),
        };
        game.refill();
        Ok(game)
    }

    fn seat(&self) -> Seat {
        match self.led {
            None => self.leader,
            Some(_) => self.leader.other(),
        }
    }

    fn is_terminal(&self) -> bool {
        self.led.is_none() && self.hands.iter().all(Hand::is_empty)
    }

    fn legal(&self) -> Vec<Move> {
        match self.is_terminal() {
            true => vec![],
            false => Self::choices(self.hand(self.seat()), self.led.is_some()),
        }
    }

    fn apply(&self, action: Move) -> Self {
        let seat = self.seat();
        let i = seat.index();
        let mut next = self.clone();
        next.history.push((seat, action));
        match (self.led, action) {
            (None, Move::Play(card)) => {
                next.hands[i].remove(card);
                next.played[i].add(card);
                next.led = Some(card);
            }
            (None, Move::Pass) => unreachable!("the leader cannot pass"),
            (Some(led), reply) => {
                let power = match reply {
                    Move::Play(card) => {
                        next.hands[i].remove(card);
                        next.played[i].add(card);
                        card.power()
                    }
                    Move::Pass => 0,
                };
                let winner = match power.cmp(&led.power()) {
                    std::cmp::Ordering::Greater => Some(seat),
                    std::cmp::Ordering::Less => Some(self.leader),
                    std::cmp::Ordering::Equal => None,
                };
                if let Some(winner) = winner {
                    next.points[winner.index()] += 1;
                    next.leader = winner;
                }
                next.led = None;
                next.refill();
            }
        }
        next
    }

    fn outcome(&self, seat: Seat) -> Utility {
        match self.points(seat).cmp(&self.points(seat.other())) {
            std::cmp::Ordering::Greater => 1.,
            std::cmp::Ordering::Less => -1.,
            std::cmp::Ordering::Equal => 0.,
        }
    }

    /// observation of the player to move:
    /// own hand, own unseen cards, opponent unseen cards, the led card,
    /// a following flag, points, hand sizes and deck sizes.
    fn encode(&self) -> Vec<f32> {
        let me = self.seat();
        let op = me.other();
        let (m, o) = (me.index(), op.index());
        let mine = self.lists[m]
            .minus(&self.played[m])
            .and_then(|h| h.minus(&self.hands[m]))
            .unwrap_or_default();
        let theirs = self.lists[o].minus(&self.played[o]).unwrap_or_default();
        let led = Card::all().map(|c| match self.led {
            Some(l) if l == c => 1.,
            _ => 0.,
        });
        let features = self.hands[m]
            .features(HAND_SIZE as f32)
            .chain(mine.features(COPIES))
            .chain(theirs.features(COPIES))
            .chain(led)
            .chain(std::iter::once(self.led.map_or(0., |_| 1.)))
            .chain([self.points[m], self.points[o]].map(|p| p as f32 / DECK_MAX as f32))
            .chain([&self.hands[m], &self.hands[o]].map(|h| h.len() as f32 / HAND_SIZE as f32))
            .chain([&self.decks[m], &self.decks[o]].map(|d| d.len() as f32 / DECK_MAX as f32))
            .collect::<Vec<f32>>();
        debug_assert_eq!(features.len(), Self::FEATURES);
        features
    }

    fn info(&self) -> View {
        let me = self.seat();
        View {
            seat: me,
            lists: self.lists,
            hand: self.hands[me.index()],
            played: self.played,
            led: self.led,
            leader: self.leader,
            points: self.points,
            held: self.hands.map(|h| h.len()),
            stock: [self.decks[0].len(), self.decks[1].len()],
            history: self.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn card(power: u8) -> Card {
        Card::try_from(power - 1).unwrap()
    }

    fn deal(a: &str, b: &str) -> Skirmish {
        let ref mut rng = SmallRng::seed_from_u64(7);
        let a = Deck::try_from(a).unwrap();
        let b = Deck::try_from(b).unwrap();
        Skirmish::initialize(&a, &b, rng).unwrap()
    }

    #[test]
    fn deal_fills_hands() {
        let game = deal("1 2 3 4 5", "6 7");
        assert_eq!(game.hand(Seat::P1).len(), HAND_SIZE);
        assert_eq!(game.hand(Seat::P2).len(), 2);
        assert_eq!(game.seat(), Seat::P1);
        assert!(!game.is_terminal());
    }

    #[test]
    fn single_card_game_ends_after_two_moves() {
        let game = deal("3", "5");
        assert_eq!(game.legal(), vec![Move::Play(card(3))]);
        let game = game.apply(Move::Play(card(3)));
        assert_eq!(game.seat(), Seat::P2);
        assert_eq!(game.legal(), vec![Move::Play(card(5))]);
        let game = game.apply(Move::Play(card(5)));
        assert!(game.is_terminal());
        assert!(game.legal().is_empty());
        assert_eq!(game.outcome(Seat::P2), 1.);
        assert_eq!(game.outcome(Seat::P1), -1.);
    }

    #[test]
    fn tie_keeps_leader_and_scores_nothing() {
        let game = deal("4 1", "4 1")
            .apply(Move::Play(card(4)))
            .apply(Move::Play(card(4)));
        assert_eq!(game.points(Seat::P1), 0);
        assert_eq!(game.points(Seat::P2), 0);
        assert_eq!(game.seat(), Seat::P1);
        assert_eq!(game.outcome(Seat::P1), 0.);
    }

    #[test]
    fn empty_follower_must_pass() {
        let game = deal("8 7", "1");
        assert_eq!(game.legal(), vec![Move::Play(card(7)), Move::Play(card(8))]);
        let game = game
            .apply(Move::Play(card(8)))
            .apply(Move::Play(card(1)))
            .apply(Move::Play(card(7)));
        assert_eq!(game.seat(), Seat::P2);
        assert_eq!(game.legal(), vec![Move::Pass]);
        let game = game.apply(Move::Pass);
        assert!(game.is_terminal());
        assert_eq!(game.points(Seat::P1), 2);
    }

    #[test]
    fn empty_leader_is_stuck() {
        // P2 wins the only trick it can play, then leads with nothing left
        let game = deal("1 2", "8")
            .apply(Move::Play(card(1)))
            .apply(Move::Play(card(8)));
        assert_eq!(game.seat(), Seat::P2);
        assert!(!game.is_terminal());
        assert!(game.legal().is_empty());
        assert_eq!(game.outcome(Seat::P2), 1.);
    }

    #[test]
    fn apply_is_pure() {
        let game = deal("1 2 3", "4 5 6");
        let copy = game.clone();
        let _ = game.apply(game.legal()[0]);
        assert_eq!(game, copy);
    }

    #[test]
    fn encoding_has_fixed_width() {
        let game = deal("1 2 3 4 5 6", "2 4 6 8");
        assert_eq!(game.encode().len(), Skirmish::FEATURES);
        let game = game.apply(game.legal()[0]);
        assert_eq!(game.encode().len(), Skirmish::FEATURES);
    }
}
