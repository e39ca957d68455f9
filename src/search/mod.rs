//! Determinized information-set tree search guided by an [`Oracle`](crate::oracle::Oracle).
mod config;
mod decision;
mod node;
mod search;
mod tree;

pub use config::*;
pub use decision::*;
pub use node::*;
pub use search::*;
pub use tree::*;
