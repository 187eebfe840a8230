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
pub struct BashToolParameters {
    #[schemars(description = "The bash command to run.")]
    command: String,
}

/// A tool for running shell commands.
///
/// The command succeeds when it exits with status 0, in which case its
/// stdout is the output. Otherwise stderr is reported as the error.
pub struct BashTool {
    parameter_schema: Value,
    timeout: Duration,
}

impl BashTool {
    /// Creates a new bash tool with a 30 seconds timeout.
    #[inline]
    pub fn new() -> Self {
        BashTool {
            parameter_schema: schema_for!(BashToolParameters).to_value(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets how long a command may run before it is killed.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for BashTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for BashTool {
    type Input = BashToolParameters;

    fn name(&self) -> &str {
        "bash_execute"
    }

    fn description(&self) -> &str {
        r#"
Runs a command in the shell and returns what it prints to stdout.
If the command exits with a non-zero status, its stderr is returned as the error."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: BashToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let limit = self.timeout;
        async move { run_command(&input.command, limit).await }
    }
}

async fn run_command(command: &str, limit: Duration) -> ToolResult {
    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| {
            ToolError::execution_error()
                .with_reason(format!("Failed to spawn shell: {err}"))
        })?;

    // Dropping the child on timeout kills it.
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(output) => output.map_err(|err| {
            ToolError::execution_error().with_reason(err.to_string())
        })?,
        Err(_) => {
            return Err(ToolError::execution_error().with_reason(format!(
                "Command timed out after {}s",
                limit.as_secs_f32()
            )));
        }
    };

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = if stderr.trim().is_empty() {
        format!("Command failed with {}", output.status)
    } else {
        stderr.into_owned()
    };
    Err(ToolError::execution_error().with_reason(reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_command() {
        let result = run_command("echo 'Hello, World!'", DEFAULT_TIMEOUT).await;
        assert_eq!(result.unwrap(), "Hello, World!\n");
    }

    #[tokio::test]
    async fn test_failing_command() {
        let err = run_command("echo oops >&2; exit 3", DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "oops\n");

        let err = run_command("exit 4", DEFAULT_TIMEOUT).await.unwrap_err();
        assert!(err.reason().contains('4'));
    }

    #[tokio::test]
    async fn test_timeout() {
        let tool = BashTool::new().with_timeout(Duration::from_millis(100));
        let err = tool
            .execute(BashToolParameters {
                command: "sleep 5".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(err.reason().contains("timed out"));
    }
}
