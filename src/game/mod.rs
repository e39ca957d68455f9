//! The rules-engine contract consumed by search and self-play.
//!
//! - [`Seat`] — which of the two players acts
//! - [`Action`] — moves, with a total bijection onto a dense index range
//! - [`Game`] — the pure functional state machine
//! - [`Info`] — what the acting player can observe, and how to resample the rest
//!
//! Nothing in here knows any concrete rules; see [`crate::skirmish`] for one ruleset.

mod action;
mod game;
mod info;
mod seat;

pub use action::*;
pub use game::*;
pub use info::*;
pub use seat::*;
