use std::fmt::{self, Display};

/// Where an [`Agent`](super::Agent) is in its lifecycle.
///
/// A run moves from `Idle` (or the `Finished` state of a previous run)
/// to `Running`, and always ends in `Finished`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// No run has started yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The latest run is over.
    Finished,
}

impl Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentState::Idle => write!(f, "idle"),
            AgentState::Running => write!(f, "running"),
            AgentState::Finished => write!(f, "finished"),
        }
    }
}
