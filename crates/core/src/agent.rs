mod builder;
mod event;
mod state;
mod summary;
#[cfg(test)]
mod tests;

use mini_agent_model::{ModelMessage, ModelRequest};
use tracing::Instrument;

use crate::memory::Memory;
use crate::model_client::ModelClient;
use crate::tool::{Tool, ToolRegistry};
pub use builder::AgentBuilder;
pub use event::AgentEvent;
pub use state::AgentState;
pub use summary::{NO_RESPONSE, RunSummary};

/// An agent that works on a task by alternating between asking the model
/// what to do next (think) and running the tools it asked for (act).
///
/// Each call to [`Agent::run`] starts over with a fresh [`Memory`], which
/// stays readable until the next run begins.
pub struct Agent {
    name: String,
    model_client: ModelClient,
    tools: ToolRegistry,
    system_prompt: String,
    max_steps: usize,
    memory: Memory,
    state: AgentState,
    current_step: usize,
    on_event: Option<Box<dyn Fn(&AgentEvent<'_>) + Send + Sync>>,
}

impl Agent {
    /// Runs `task` to completion and summarizes the outcome.
    ///
    /// The loop asks the model at most `max_steps` times. Every batch of
    /// tool calls the model requests is executed in full, including one
    /// requested on the last allowed step.
    ///
    /// Runs never overlap, since this borrows the agent exclusively. If the
    /// returned future is dropped before it completes, the agent is left
    /// `Finished` with the memory recorded so far.
    pub async fn run<S: Into<String>>(&mut self, task: S) -> RunSummary {
        let span = info_span!("agent run", agent = %self.name);
        let mut guard = RunGuard { agent: self };
        guard.agent.run_task(task.into()).instrument(span).await
    }

    async fn run_task(&mut self, task: String) -> RunSummary {
        info!("starting task: {task}");
        self.state = AgentState::Running;
        self.current_step = 0;
        self.memory = Memory::default();
        self.memory.add(ModelMessage::user(task));

        while self.state == AgentState::Running
            && self.current_step < self.max_steps
        {
            self.current_step += 1;
            debug!("step {}/{}", self.current_step, self.max_steps);
            self.emit(&AgentEvent::StepStarted {
                step: self.current_step,
                max_steps: self.max_steps,
            });

            if !self.think().await {
                break;
            }
            self.act().await;
        }

        if self.state == AgentState::Running {
            info!("step budget exhausted after {} steps", self.current_step);
        }
        self.state = AgentState::Finished;

        let summary = self.summarize();
        info!("task finished after {} steps", summary.steps());
        self.emit(&AgentEvent::Finished { summary: &summary });
        summary
    }

    /// Asks the model for the next move. Returns `true` if it wants tools
    /// to be called.
    async fn think(&mut self) -> bool {
        let request = ModelRequest {
            system_prompt: Some(self.system_prompt.clone())
                .filter(|prompt| !prompt.is_empty()),
            messages: self.memory.snapshot(),
            tools: self.tools.schemas(),
        };
        let resp = self.model_client.send_request(request).await;

        if let Some(kind) = resp.failure {
            warn!("model call failed ({kind}), finishing the run");
        }
        let wants_tools = resp.failure.is_none() && !resp.tool_calls.is_empty();

        match ModelMessage::assistant(resp.content, resp.tool_calls) {
            Some(msg) => {
                self.emit(&AgentEvent::Thought {
                    content: msg.content(),
                    tool_calls: msg.tool_calls(),
                });
                self.memory.add(msg);
            }
            None => debug!("model returned an empty message"),
        }

        if !wants_tools {
            self.state = AgentState::Finished;
        }
        wants_tools
    }

    /// Runs the tool calls of the latest assistant message, one at a time
    /// and in request order, recording one tool message per call.
    async fn act(&mut self) {
        let tool_calls = match self.memory.last() {
            Some(msg @ ModelMessage::Assistant { .. }) => msg.tool_calls().to_vec(),
            _ => return,
        };

        for call in &tool_calls {
            self.emit(&AgentEvent::ToolStarted { call });
            let result = self.tools.dispatch(&call.name, &call.arguments).await;
            let content = match &result {
                Ok(output) => {
                    debug!("tool `{}` succeeded", call.name);
                    output.clone()
                }
                Err(err) => {
                    warn!("tool `{}` failed: {err}", call.name);
                    format!("Error: {err}")
                }
            };
            self.emit(&AgentEvent::ToolFinished {
                call,
                result: &result,
            });
            self.memory.add(ModelMessage::tool(call.id.clone(), content));
        }
    }

    fn summarize(&self) -> RunSummary {
        RunSummary::new(
            self.memory.first_user_content().map(ToOwned::to_owned),
            self.current_step,
            self.state,
            self.memory.last_assistant_content().map(ToOwned::to_owned),
        )
    }

    #[inline]
    fn emit(&self, event: &AgentEvent<'_>) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }
}

/// Leaves the agent `Finished` when a run is cancelled midway.
struct RunGuard<'a> {
    agent: &'a mut Agent,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.agent.state == AgentState::Running {
            warn!(
                "run cancelled at step {}/{}",
                self.agent.current_step, self.agent.max_steps
            );
            self.agent.state = AgentState::Finished;
        }
    }
}

impl Agent {
    /// Registers a tool, replacing any tool with the same name.
    #[inline]
    pub fn register_tool<T: Tool>(&mut self, tool: T) {
        self.tools.register(tool);
    }

    /// Returns the name of the agent.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the registered tools.
    #[inline]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Returns the memory of the current or latest run.
    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Returns the number of think steps taken in the current or latest run.
    #[inline]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the step budget of each run.
    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            name,
            model_client,
            tools,
            system_prompt,
            max_steps,
            on_event,
        } = builder;

        Self {
            name,
            model_client,
            tools,
            system_prompt,
            max_steps,
            memory: Default::default(),
            state: Default::default(),
            current_step: 0,
            on_event,
        }
    }
}
