//! Proximal policy optimization over self-play trajectories.
mod config;
mod ppo;
mod sample;

pub use config::*;
pub use ppo::*;
pub use sample::*;
