use strum::AsRefStr;

/// Actions understood by the count-list reducer
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
pub enum Action {
    /// Increment the parent counter
    Up,
    /// Decrement the child counter
    Down,
    /// Pick a palette color; the seed is reduced modulo the palette size
    Random(u64),
    /// Does nothing; listeners are still notified
    Noop,
}
