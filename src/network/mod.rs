//! Reference policy-value backend: two layer-normed MLP towers on candle.
mod encoder;
mod network;
mod norm;

pub use encoder::*;
pub use network::*;
pub use norm::*;
