use mini_agent_model::{
    ErrorKind, ModelMessage, ModelRequest, ModelResponse, ModelTool,
    ToolCallRequest,
};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ModelMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ModelTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    let system = req
        .system_prompt
        .as_deref()
        .filter(|prompt| !prompt.is_empty())
        .map(ModelMessage::system);
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: system.into_iter().chain(req.messages.clone()).collect(),
        temperature: config.temperature,
        tools: req.tools.clone(),
        tool_choice: if req.tools.is_empty() {
            None
        } else {
            Some("auto")
        },
    }
}

/// Takes the first choice of a completion as the model's answer.
pub fn into_model_response(
    completion: ChatCompletion,
) -> Result<ModelResponse, Error> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new(
            "completion has no choices",
            ErrorKind::InvalidResponse,
        ));
    };
    Ok(ModelResponse {
        content: choice.message.content,
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
    })
}

/// Extracts the human-readable message from an error payload, falling
/// back to the raw body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(body) => body.error.message,
        Err(_) => body.trim().to_owned(),
    }
}
