use serde::Deserialize;
use serde::Serialize;

/// One of the two players at the table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    P1,
    P2,
}

impl Seat {
    pub fn all() -> [Self; 2] {
        [Self::P1, Self::P2]
    }
    pub fn other(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }
    pub fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }
}

impl From<usize> for Seat {
    fn from(index: usize) -> Self {
        match index % 2 {
            0 => Self::P1,
            _ => Self::P2,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
        }
    }
}
