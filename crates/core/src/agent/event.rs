use mini_agent_model::ToolCallRequest;

use super::RunSummary;
use crate::tool::ToolResult;

/// Progress reported by a running [`Agent`](super::Agent).
#[derive(Debug)]
pub enum AgentEvent<'a> {
    /// A think step is about to begin.
    StepStarted {
        /// 1-based index of the step.
        step: usize,
        /// The step budget of the run.
        max_steps: usize,
    },
    /// The model answered and the answer was recorded.
    Thought {
        /// Text of the answer.
        content: Option<&'a str>,
        /// Tools the model wants to call.
        tool_calls: &'a [ToolCallRequest],
    },
    /// A tool call is about to be dispatched.
    ToolStarted {
        /// The call being dispatched.
        call: &'a ToolCallRequest,
    },
    /// A tool call has completed, successfully or not.
    ToolFinished {
        /// The call that completed.
        call: &'a ToolCallRequest,
        /// What the tool returned.
        result: &'a ToolResult,
    },
    /// The run is over.
    Finished {
        /// The outcome of the run.
        summary: &'a RunSummary,
    },
}
