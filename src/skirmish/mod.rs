//! Skirmish, a small two-player trick-taking card game.
//!
//! Each player brings a public decklist of up to `DECK_MAX` cards drawn from
//! `KINDS` kinds. Hands refill to `HAND_SIZE` after every trick; the opponent's
//! hand and both draw orders are hidden, which is what makes the game a fit
//! for information-set search.

mod card;
mod deck;
mod edge;
mod state;
mod view;

pub use card::*;
pub use deck::*;
pub use edge::*;
pub use state::*;
pub use view::*;
