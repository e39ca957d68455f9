//! Self-play: complete games driven by search for both seats, recorded as
//! per-seat trajectories for the trainer.
mod config;
mod play;
mod pool;
mod trajectory;

pub use config::*;
pub use play::*;
pub use pool::*;
pub use trajectory::*;
