//! The policy-value oracle consumed by search and self-play.
mod oracle;
mod snapshot;
mod uniform;

pub use oracle::*;
pub use snapshot::*;
pub use uniform::*;
