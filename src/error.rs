use thiserror::Error;

/// Every failure the search and training loop can surface.
///
/// Configuration errors (`Deck`, `Shape`, `Parameter`, `Determinization`) abort a run.
/// `Oracle` is propagated to whoever asked for the evaluation. `Numeric`
/// aborts one update and leaves the previous snapshot valid.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed deck: {0}")]
    Deck(String),

    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    Shape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("checkpoint has no parameter {0}")]
    Parameter(String),

    #[error("determinization rejected {0} times in a row")]
    Determinization(usize),

    #[error("oracle evaluation failed: {0}")]
    Oracle(String),

    #[error("numeric fault in {0}")]
    Numeric(&'static str),

    #[error("tensor backend: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("checkpoint io: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint format: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// fatal misconfiguration of decks, shapes or determinization
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Deck(_) | Self::Shape { .. } | Self::Parameter(_) | Self::Determinization(_)
        )
    }
    pub fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        Self::Shape {
            what,
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
