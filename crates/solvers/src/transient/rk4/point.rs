/// A state paired with the time at which it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<S> {
    /// Time at which the state holds.
    pub time: f64,
    /// State at `time`.
    pub state: S,
}
