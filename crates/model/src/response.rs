use serde::{Deserialize, Serialize};

/// The model's answer to a [`ModelRequest`](crate::ModelRequest).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelResponse {
    /// The text part of the answer.
    pub content: Option<String>,
    /// Tools the model wants to call, in request order.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    /// Creates a text-only response.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
        }
    }
}

/// Describes a tool call request from the model.
///
/// Serializes to the wire shape
/// `{"id", "type": "function", "function": {"name", "arguments"}}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WireToolCall", into = "WireToolCall")]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The serialized argument object, exactly as the model produced it.
    pub arguments: String,
}

#[derive(Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(default = "function_type")]
    r#type: String,
    function: WireFunction,
}

#[derive(Clone, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_owned()
}

impl From<WireToolCall> for ToolCallRequest {
    #[inline]
    fn from(wire: WireToolCall) -> Self {
        Self {
            id: wire.id,
            name: wire.function.name,
            arguments: wire.function.arguments,
        }
    }
}

impl From<ToolCallRequest> for WireToolCall {
    #[inline]
    fn from(req: ToolCallRequest) -> Self {
        Self {
            id: req.id,
            r#type: function_type(),
            function: WireFunction {
                name: req.name,
                arguments: req.arguments,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_tool_call() {
        let call: ToolCallRequest = serde_json::from_str(
            r#"{
                "id": "call_abc",
                "type": "function",
                "function": {
                    "name": "python_execute",
                    "arguments": "{\"code\": \"print(1)\"}"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(call.id, "call_abc");
        assert_eq!(call.name, "python_execute");
        assert_eq!(call.arguments, r#"{"code": "print(1)"}"#);
    }
}
