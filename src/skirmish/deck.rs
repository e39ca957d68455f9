use super::*;
use crate::*;

/// A validated decklist: between 1 and `DECK_MAX` cards of known kinds.
///
/// Decklists are public; only the order a deck is drawn in is hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// two copies of every kind
    pub fn standard() -> Self {
        Self(Card::all().flat_map(|c| [c, c]).collect())
    }
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn composition(&self) -> Hand {
        self.0.iter().copied().collect()
    }
}

impl TryFrom<Vec<Card>> for Deck {
    type Error = Error;
    fn try_from(cards: Vec<Card>) -> Result<Self> {
        match cards.len() {
            0 => Err(Error::Deck("deck is empty".into())),
            n if n > DECK_MAX => Err(Error::Deck(format!(
                "deck holds {} cards, at most {} allowed",
                n, DECK_MAX
            ))),
            _ => Ok(Self(cards)),
        }
    }
}

impl TryFrom<Vec<u8>> for Deck {
    type Error = Error;
    fn try_from(kinds: Vec<u8>) -> Result<Self> {
        kinds
            .into_iter()
            .map(Card::try_from)
            .collect::<Result<Vec<Card>>>()
            .and_then(Self::try_from)
    }
}

/// parse card powers, e.g. "1 1 4 8" or "1,1,4,8"
impl TryFrom<&str> for Deck {
    type Error = Error;
    fn try_from(s: &str) -> Result<Self> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u8>()
                    .ok()
                    .and_then(|power| power.checked_sub(1))
                    .ok_or_else(|| Error::Deck(format!("invalid card power '{}'", t)))
            })
            .collect::<Result<Vec<u8>>>()
            .and_then(Self::try_from)
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.composition())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_valid() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), 2 * KINDS);
        assert!(Deck::try_from(deck.cards().to_vec()).is_ok());
    }

    #[test]
    fn malformed_decks() {
        assert!(matches!(Deck::try_from(Vec::<u8>::new()), Err(Error::Deck(_))));
        assert!(matches!(Deck::try_from(vec![0u8; DECK_MAX + 1]), Err(Error::Deck(_))));
        assert!(matches!(Deck::try_from(vec![0u8, KINDS as u8]), Err(Error::Deck(_))));
        assert!(Deck::try_from(vec![0u8; DECK_MAX]).is_ok());
    }

    #[test]
    fn parse_powers() {
        let deck = Deck::try_from("1 1, 4 8").unwrap();
        assert_eq!(
            deck.cards().iter().map(Card::power).collect::<Vec<_>>(),
            vec![1, 1, 4, 8]
        );
        assert!(Deck::try_from("0 1").is_err());
        assert!(Deck::try_from("9").is_err());
        assert!(Deck::try_from("x").is_err());
        assert!(Deck::try_from("").unwrap_err().is_config());
    }
}
