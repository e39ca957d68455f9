//! The snapshot → self-play → update → publish training loop.
mod config;
mod pipeline;
mod stats;

pub use config::*;
pub use pipeline::*;
pub use stats::*;
