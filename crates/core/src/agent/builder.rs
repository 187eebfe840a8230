use mini_agent_model::ModelProvider;

use super::{Agent, AgentEvent};
use crate::model_client::ModelClient;
use crate::tool::{Tool, ToolRegistry};

const DEFAULT_NAME: &str = "MiniAgent";
const DEFAULT_MAX_STEPS: usize = 10;
const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that completes tasks by calling the tools you are \
given. Call one tool at a time, look at its result, and then decide what to do \
next. When the task is done, reply with a short answer and no tool calls.";

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) name: String,
    pub(crate) model_client: ModelClient,
    pub(crate) tools: ToolRegistry,
    pub(crate) system_prompt: String,
    pub(crate) max_steps: usize,
    pub(crate) on_event: Option<Box<dyn Fn(&AgentEvent<'_>) + Send + Sync>>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            model_client: ModelClient::new(provider),
            tools: ToolRegistry::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            max_steps: DEFAULT_MAX_STEPS,
            on_event: None,
        }
    }

    /// Sets the name of the agent, which shows up in logs.
    #[inline]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the system prompt sent with every model request.
    ///
    /// An empty prompt means no system message is sent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets how many times a run may ask the model. Defaults to 10.
    #[inline]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Attaches a callback to be invoked as the agent makes progress.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&AgentEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Registers a tool. A later tool with the same name wins.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
