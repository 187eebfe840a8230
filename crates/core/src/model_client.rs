use std::pin::Pin;
use std::sync::Arc;

use mini_agent_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
    ToolCallRequest,
};
use tracing::Instrument;

type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = ModelClientResponse> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
///
/// The client never fails: an error from the provider is turned into a
/// response that describes the failure and requests no tools, which lets
/// the agent loop finish gracefully.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    /// Wraps a model provider.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            trace!("got a request: {req:?}");
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    match fut.await {
                        Ok(resp) => {
                            trace!("finished a request");
                            ModelClientResponse {
                                content: resp.content,
                                tool_calls: resp.tool_calls,
                                failure: None,
                            }
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            ModelClientResponse {
                                content: Some(format!(
                                    "Model call failed: {err}"
                                )),
                                tool_calls: vec![],
                                failure: Some(err.kind()),
                            }
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe as long as the provider's request
    /// future is.
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> ModelClientResponse {
        (self.handler_fn)(req).await
    }
}

/// A completely received response from the model client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelClientResponse {
    /// Text of the response, or the failure description.
    pub content: Option<String>,
    /// Tool calls requested by the model. Always empty on failure.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Set when the request failed.
    pub failure: Option<ErrorKind>,
}

#[cfg(test)]
mod tests {
    use mini_agent_model::ModelMessage;
    use mini_agent_test_model::{
        PresetResponse, TestModelProvider, tool_call,
    };

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            system_prompt: None,
            messages: vec![ModelMessage::user("Hi")],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_response(
            PresetResponse::with_tool_calls([tool_call(
                "call:1",
                "bash_execute",
                r#"{"command":"date"}"#,
            )])
            .and_content("How are you?"),
        );

        let model_client = ModelClient::new(model_provider);

        for _ in 0..3 {
            let resp = model_client.send_request(request()).await;
            assert_eq!(resp.content.as_deref(), Some("How are you?"));
            assert_eq!(resp.tool_calls.len(), 1);
            assert_eq!(resp.failure, None);
        }
    }

    #[tokio::test]
    async fn test_error_handling() {
        let mut model_provider = TestModelProvider::default();
        model_provider
            .add_response(PresetResponse::with_failure(ErrorKind::Network));
        let model_client = ModelClient::new(model_provider);
        let resp = model_client.send_request(request()).await;
        assert_eq!(resp.failure, Some(ErrorKind::Network));
        assert!(resp.tool_calls.is_empty());
        assert!(
            resp.content.unwrap().starts_with("Model call failed: ")
        );
    }
}
