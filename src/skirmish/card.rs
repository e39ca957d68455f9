use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// A card is just its kind; a card of kind k has power k + 1.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card(u8);

impl Card {
    pub fn all() -> impl Iterator<Item = Self> {
        (0..KINDS as u8).map(Self)
    }
    pub fn kind(&self) -> usize {
        self.0 as usize
    }
    pub fn power(&self) -> u8 {
        self.0 + 1
    }
}

impl TryFrom<u8> for Card {
    type Error = Error;
    fn try_from(kind: u8) -> Result<Self> {
        match kind as usize {
            k if k < KINDS => Ok(Self(kind)),
            k => Err(Error::Deck(format!("unknown card kind {}", k))),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.power())
    }
}

/// A multiset of cards stored as per-kind counts.
/// Used for hands, decklists, and everything already played.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hand([u8; KINDS]);

impl Hand {
    pub fn len(&self) -> usize {
        self.0.iter().map(|&n| n as usize).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }
    pub fn count(&self, card: Card) -> u8 {
        self.0[card.kind()]
    }
    pub fn contains(&self, card: Card) -> bool {
        self.count(card) > 0
    }
    pub fn add(&mut self, card: Card) {
        self.0[card.kind()] += 1;
    }
    pub fn remove(&mut self, card: Card) {
        assert!(self.contains(card), "card {} not held", card);
        self.0[card.kind()] -= 1;
    }
    /// distinct kinds held, weakest first
    pub fn kinds(&self) -> impl Iterator<Item = Card> + '_ {
        Card::all().filter(|c| self.contains(*c))
    }
    /// every card held, with multiplicity, weakest first
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        Card::all().flat_map(|c| std::iter::repeat(c).take(self.count(c) as usize))
    }
    /// multiset difference; None if `other` is not contained in `self`
    pub fn minus(&self, other: &Self) -> Option<Self> {
        let mut counts = [0; KINDS];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = self.0[i].checked_sub(other.0[i])?;
        }
        Some(Self(counts))
    }
    /// counts as features, scaled by `scale`
    pub fn features(&self, scale: f32) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().map(move |&n| n as f32 / scale)
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut hand = Self::default();
        iter.into_iter().for_each(|c| hand.add(c));
        hand
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self.cards().map(|c| c.to_string()).collect::<Vec<_>>();
        write!(f, "[{}]", cards.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_bounded() {
        assert!(Card::try_from(0).is_ok());
        assert!(Card::try_from(KINDS as u8 - 1).is_ok());
        assert!(Card::try_from(KINDS as u8).is_err());
        assert_eq!(Card::all().count(), KINDS);
    }

    #[test]
    fn multiset_arithmetic() {
        let c = |k| Card::try_from(k).unwrap();
        let hand = [c(0), c(0), c(3), c(5)].into_iter().collect::<Hand>();
        assert_eq!(hand.len(), 4);
        assert_eq!(hand.count(c(0)), 2);
        assert_eq!(hand.kinds().collect::<Vec<_>>(), vec![c(0), c(3), c(5)]);
        assert_eq!(hand.cards().collect::<Vec<_>>(), vec![c(0), c(0), c(3), c(5)]);
        let some = [c(0), c(5)].into_iter().collect::<Hand>();
        let rest = hand.minus(&some).unwrap();
        assert_eq!(rest.cards().collect::<Vec<_>>(), vec![c(0), c(3)]);
        assert!(some.minus(&hand).is_none());
    }

    #[test]
    #[should_panic]
    fn remove_missing() {
        Hand::default().remove(Card::try_from(1).unwrap());
    }
}
