use super::Point;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a fixed-step RK4 run.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    /// How the solver terminated.
    pub status: Status,

    /// Points visited by the solver, including the initial point.
    pub history: Vec<Point<S>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

impl<S> Solution<S> {
    /// Returns the last point reached.
    #[must_use]
    pub fn last(&self) -> Option<&Point<S>> {
        self.history.last()
    }
}
