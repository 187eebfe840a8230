use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use mini_agent_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tokio::time::timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PythonToolParameters {
    #[schemars(
        description = "The Python code to run. Use `print` to produce output."
    )]
    code: String,
}

/// A tool for running Python snippets.
///
/// Every call runs in its own interpreter process. The process's pipes
/// capture what the snippet prints, and they go away with the process when
/// the call returns, whether it succeeded or not. A snippet that runs past
/// the timeout is killed.
pub struct PythonTool {
    parameter_schema: Value,
    interpreter: OsString,
    timeout: Duration,
}

impl PythonTool {
    /// Creates a new Python tool that runs `python3`.
    #[inline]
    pub fn new() -> Self {
        Self::with_interpreter("python3")
    }

    /// Creates a new Python tool that runs the given interpreter.
    #[inline]
    pub fn with_interpreter<S: Into<OsString>>(interpreter: S) -> Self {
        PythonTool {
            parameter_schema: schema_for!(PythonToolParameters).to_value(),
            interpreter: interpreter.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets how long a snippet may run before it is killed. Defaults to
    /// 30 seconds.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PythonTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PythonTool {
    type Input = PythonToolParameters;

    fn name(&self) -> &str {
        "python_execute"
    }

    fn description(&self) -> &str {
        r#"
Runs Python code and returns what it prints to stdout.
If the code raises, the traceback is returned as the error."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: PythonToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let mut command = Command::new(&self.interpreter);
        command
            .arg("-c")
            .arg(input.code)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let limit = self.timeout;
        async move {
            let Ok(output) = timeout(limit, command.output()).await else {
                return Err(ToolError::execution_error().with_reason(format!(
                    "Python timed out after {}s",
                    limit.as_secs_f32()
                )));
            };
            let output = output.map_err(|err| {
                ToolError::execution_error()
                    .with_reason(format!("Failed to start Python: {err}"))
            })?;
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            } else {
                Err(ToolError::execution_error().with_reason(
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                ))
            }
        }
    }
}
