use mini_agent_core::{Agent, AgentBuilder, AgentEvent, RunSummary};
use mini_agent_model::ModelProvider;

use crate::tools::*;

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("./system_prompt.md");

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider)
            .with_system_prompt(default_system_prompt());
        Self { agent_builder }
    }

    /// Replaces the built-in system prompt.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Sets how many times a task may ask the model.
    #[inline]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.agent_builder = self.agent_builder.with_max_steps(max_steps);
        self
    }

    /// Attaches a callback to be invoked as the agent makes progress.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&AgentEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_event(on_event);
        self
    }

    /// Builds a new session with all the built-in tools registered.
    pub fn build(self) -> Session {
        let agent = self
            .agent_builder
            .with_tool(PythonTool::new())
            .with_tool(FileEditorTool::new())
            .with_tool(BashTool::new())
            .build();

        Session { agent }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent that you can use directly, and it
/// is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Works on a task until the model stops calling tools or the step
    /// budget runs out.
    #[inline]
    pub async fn run(&mut self, task: &str) -> RunSummary {
        self.agent.run(task).await
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

/// Returns the built-in system prompt, filled in for the host OS.
pub fn default_system_prompt() -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{{HOST_OS}}", host_os())
}

#[inline]
fn host_os() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        _ => "some other OS",
    }
}
