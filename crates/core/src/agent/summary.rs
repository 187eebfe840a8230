use std::fmt::{self, Display};

use super::AgentState;

/// What [`RunSummary::main_response`] returns when the model never said
/// anything.
pub const NO_RESPONSE: &str = "no response";

const UNKNOWN_TASK: &str = "unknown";

/// The outcome of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    task: Option<String>,
    steps: usize,
    state: AgentState,
    main_response: Option<String>,
}

impl RunSummary {
    pub(crate) fn new(
        task: Option<String>,
        steps: usize,
        state: AgentState,
        main_response: Option<String>,
    ) -> Self {
        Self {
            task,
            steps,
            state,
            main_response,
        }
    }

    /// Returns the task the run worked on.
    #[inline]
    pub fn task(&self) -> &str {
        self.task.as_deref().unwrap_or(UNKNOWN_TASK)
    }

    /// Returns the number of think steps taken.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the state the agent ended in.
    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Returns the latest non-empty text from the model, or [`NO_RESPONSE`].
    #[inline]
    pub fn main_response(&self) -> &str {
        self.main_response.as_deref().unwrap_or(NO_RESPONSE)
    }

    /// Returns `true` if the model produced any text.
    #[inline]
    pub fn has_response(&self) -> bool {
        self.main_response.is_some()
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task summary:")?;
        writeln!(f, "- Task: {}", self.task())?;
        writeln!(f, "- Steps: {}", self.steps)?;
        writeln!(f, "- Final state: {}", self.state)?;
        write!(f, "- Main response: {}", self.main_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let summary = RunSummary::new(
            Some("echo hello".to_owned()),
            2,
            AgentState::Finished,
            Some("done".to_owned()),
        );
        assert_eq!(
            summary.to_string(),
            "Task summary:\n\
             - Task: echo hello\n\
             - Steps: 2\n\
             - Final state: finished\n\
             - Main response: done"
        );

        let empty = RunSummary::new(None, 0, AgentState::Finished, None);
        assert_eq!(empty.task(), "unknown");
        assert_eq!(empty.main_response(), NO_RESPONSE);
        assert!(!empty.has_response());
    }
}
