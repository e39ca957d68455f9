use super::*;
use crate::game::*;
use crate::*;

/// A move in Skirmish.
///
/// The leader must `Play`. The follower plays a card if one is held,
/// and otherwise must `Pass`, conceding the trick.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Move {
    Play(Card),
    Pass,
}

impl Action for Move {
    const SPACE: usize = KINDS + 1;
    fn index(&self) -> usize {
        match self {
            Self::Play(card) => card.kind(),
            Self::Pass => KINDS,
        }
    }
    fn from_index(index: usize) -> Option<Self> {
        match index {
            i if i < KINDS => Card::try_from(i as u8).ok().map(Self::Play),
            i if i == KINDS => Some(Self::Pass),
            _ => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play(card) => write!(f, "play {}", card),
            Self::Pass => write!(f, "pass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_bijection() {
        for index in 0..Move::SPACE {
            let action = Move::from_index(index).expect("total over the space");
            assert_eq!(action.index(), index);
        }
        assert_eq!(Move::from_index(Move::SPACE), None);
    }

    #[test]
    fn index_order_matches_ord() {
        let mut moves = (0..Move::SPACE)
            .filter_map(Move::from_index)
            .collect::<Vec<_>>();
        moves.reverse();
        moves.sort();
        assert!(moves.windows(2).all(|w| w[0].index() < w[1].index()));
    }
}
