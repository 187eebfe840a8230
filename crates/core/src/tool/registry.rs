use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use mini_agent_model::ModelTool;
use tokio::task::JoinError;
use tracing::Instrument;

use crate::tool::object::{ToolObject, ToolObjectImpl};
use crate::tool::{Error, Tool, ToolResult};

/// A name-keyed set of tools that handles tool call requests from the model.
///
/// Tools keep the order they were first registered in. Registering a tool
/// whose name is already taken replaces the previous one in place.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn ToolObject>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name.
    pub fn register<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        let tool: Box<dyn ToolObject> = Box::new(ToolObjectImpl(tool));
        match self.index.get(&name) {
            Some(&idx) => {
                debug!("replacing tool: {name}");
                self.tools[idx] = tool;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Returns `true` if a tool named `name` is registered.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the names of the registered tools, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name())
    }

    /// Returns the descriptors of the registered tools, in registration
    /// order, ready to be sent to the model.
    pub fn schemas(&self) -> Vec<ModelTool> {
        self.tools.iter().map(|tool| tool.descriptor()).collect()
    }

    /// Runs the tool `name` with the serialized argument object `arguments`.
    ///
    /// This never fails by itself: unknown tools, malformed arguments,
    /// tool errors and tool panics all come back as an `Err` result.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> ToolResult {
        let Some(&idx) = self.index.get(name) else {
            warn!("tool not found: {name}");
            return Err(Error::unknown_tool()
                .with_reason(format!("Tool `{name}` does not exist")));
        };
        let tool = &self.tools[idx];
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| {
            tool.prepare(arguments)
        })) {
            Ok(fut) => fut?,
            Err(payload) => {
                error!("tool `{name}` panicked before running");
                return Err(panic_to_tool_error(payload.as_ref()));
            }
        };
        let fut = fut.instrument(debug_span!("tool execute", tool = name));

        // Tools run on their own task, so that a panic is contained there
        // instead of tearing down the agent.
        match tokio::spawn(fut).await {
            Ok(result) => result,
            Err(err) => {
                error!("tool `{name}` did not complete: {err}");
                Err(join_error_to_tool_error(err))
            }
        }
    }
}

fn join_error_to_tool_error(err: JoinError) -> Error {
    if !err.is_panic() {
        return Error::execution_error()
            .with_reason("Tool execution was cancelled");
    }
    panic_to_tool_error(err.into_panic().as_ref())
}

fn panic_to_tool_error(payload: &(dyn Any + Send)) -> Error {
    match panic_message(payload) {
        Some(message) => Error::panicked().with_reason(message),
        None => Error::panicked(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return Some((*message).to_owned());
    }
    payload.downcast_ref::<String>().cloned()
}
