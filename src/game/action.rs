/// A move in the abstract action space.
///
/// Actions are tagged variants, never positions in some node's child list.
/// Every action the rules can emit maps to exactly one index in `0..SPACE`
/// and back, which is how oracle output vectors line up with legal moves.
pub trait Action:
    Copy
    + Clone
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + std::hash::Hash
    + std::fmt::Debug
{
    /// size of the dense index range
    const SPACE: usize;
    /// dense index in `0..SPACE`
    fn index(&self) -> usize;
    /// inverse of `index`; None outside `0..SPACE`
    fn from_index(index: usize) -> Option<Self>;
}
