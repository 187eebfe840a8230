use mini_agent_model::{ErrorKind, ModelResponse, ToolCallRequest};
use serde::{Deserialize, Serialize};

/// The preset answer for one think step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Text of the answer.
    pub content: Option<String>,
    /// Tool calls of the answer.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
    /// If set, the request fails with this kind of error instead.
    #[serde(skip)]
    pub failure: Option<ErrorKind>,
}

impl PresetResponse {
    /// Creates a text-only `PresetResponse`.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Creates a `PresetResponse` that requests the given tool calls.
    #[inline]
    pub fn with_tool_calls(
        tool_calls: impl Into<Vec<ToolCallRequest>>,
    ) -> Self {
        Self {
            tool_calls: tool_calls.into(),
            ..Default::default()
        }
    }

    /// Creates a `PresetResponse` that makes the request fail.
    #[inline]
    pub fn with_failure(kind: ErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Default::default()
        }
    }

    /// Attaches text to the response.
    #[inline]
    pub fn and_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    pub(crate) fn to_response(&self) -> ModelResponse {
        ModelResponse {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
        }
    }
}

/// Shorthand for building a [`ToolCallRequest`].
#[inline]
pub fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments: arguments.to_owned(),
    }
}
