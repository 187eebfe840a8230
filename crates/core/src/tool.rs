//! Tools, and the registry that dispatches calls to them.

mod error;
mod object;
mod registry;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::{Error, ErrorKind};
pub use registry::ToolRegistry;

/// The result of a tool call.
///
/// `Ok` carries the tool's output, `Err` describes why it failed. The two
/// are exclusive by construction.
pub type ToolResult = Result<String, Error>;

/// Something the model can ask the agent to do, such as running a command.
///
/// A tool is registered once and may be executed many times, so keep any
/// configuration (a timeout, an interpreter path) in the tool itself and
/// clone what the execution needs into the returned future.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    ///
    /// Arguments from the model are deserialized into this type before
    /// [`Tool::execute`] is called, so this is where unknown or missing keys
    /// are rejected.
    type Input: DeserializeOwned;

    /// The name the model calls the tool by. Unique within a registry.
    fn name(&self) -> &str;

    /// Tells the model what the tool does and when to use it.
    fn description(&self) -> &str;

    /// JSON schema of [`Tool::Input`], shown to the model as-is.
    fn parameter_schema(&self) -> &Value;

    /// Runs the tool.
    ///
    /// The future must not borrow `self`; it is driven on a separate task.
    /// Returning `Err` reports the failure to the model, it does not stop
    /// the agent.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static;
}
