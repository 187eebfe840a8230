use std::fmt::{self, Display};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::response::ToolCallRequest;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelRequest {
    /// The system instructions. Providers place them ahead of `messages`.
    pub system_prompt: Option<String>,
    /// The conversation so far, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Tools that are available to the model.
    pub tools: Vec<ModelTool>,
}

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system instructions.
    System,
    /// The human that gives the task.
    User,
    /// The model.
    Assistant,
    /// The output of a tool invocation.
    Tool,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A complete message.
///
/// The serialized form is the chat-completion wire shape: `role`, then
/// whichever of `content`, `tool_calls` and `tool_call_id` are set. Unset
/// fields are omitted, never emitted as empty placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ModelMessage {
    /// The system instructions.
    System {
        /// The instruction text.
        content: String,
    },
    /// A user input text.
    User {
        /// The input text.
        content: String,
    },
    /// A message from the model, which carries text, tool calls, or both.
    Assistant {
        /// The text part of the message.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Tool invocations requested by the model, in request order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// A tool call result.
    Tool {
        /// The identifier of the tool call this message answers.
        tool_call_id: String,
        /// The output of the tool, or a description of its failure. Left
        /// out on the wire when the tool printed nothing.
        #[serde(default, skip_serializing_if = "String::is_empty")]
        content: String,
    },
}

impl ModelMessage {
    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    ///
    /// Empty text is normalized to `None`. Returns `None` when there is
    /// neither text nor any tool call, since such a message means nothing
    /// to the model.
    pub fn assistant(
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Option<Self> {
        let content = content.filter(|c| !c.is_empty());
        if content.is_none() && tool_calls.is_empty() {
            return None;
        }
        Some(Self::Assistant {
            content,
            tool_calls,
        })
    }

    /// Creates a tool message answering the tool call `tool_call_id`.
    #[inline]
    pub fn tool<S1: Into<String>, S2: Into<String>>(
        tool_call_id: S1,
        content: S2,
    ) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// Returns the text content, if any.
    #[inline]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } => Some(content),
            Self::Tool { content, .. } => {
                Some(content.as_str()).filter(|c| !c.is_empty())
            }
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Returns the tool calls carried by an assistant message.
    #[inline]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Returns the tool call this message answers, for tool messages.
    #[inline]
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::Tool { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }
}

/// Describes a tool that can be used by the model.
///
/// Serializes to the function-definition shape:
/// `{"type": "function", "function": {name, description, parameters}}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}

impl Serialize for ModelTool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: &'a Value,
        }

        #[derive(Serialize)]
        struct Definition<'a> {
            r#type: &'static str,
            function: Function<'a>,
        }

        Definition {
            r#type: "function",
            function: Function {
                name: &self.name,
                description: &self.description,
                parameters: &self.parameters,
            },
        }
        .serialize(serializer)
    }
}
