use std::future::ready;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mini_agent_model::{ErrorKind, ModelMessage, Role};
use mini_agent_test_model::{PresetResponse, TestModelProvider, tool_call};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::timeout;

use crate::tool::{Error as ToolError, Tool, ToolResult};
use crate::{AgentBuilder, AgentEvent, AgentState, NO_RESPONSE};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EchoInput {
    text: String,
}

struct EchoTool {
    schema: Value,
}

impl EchoTool {
    fn new() -> Self {
        Self {
            schema: json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }),
        }
    }
}

impl Tool for EchoTool {
    type Input = EchoInput;

    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the text back"
    }

    fn parameter_schema(&self) -> &Value {
        &self.schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(Ok(input.text))
    }
}

struct BrokenTool {
    schema: Value,
}

impl Tool for BrokenTool {
    type Input = Value;

    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Fails or panics, depending on `mode`"
    }

    fn parameter_schema(&self) -> &Value {
        &self.schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            if input["mode"] == "panic" {
                panic!("broken beyond repair");
            }
            ToolResult::Err(
                ToolError::execution_error().with_reason("permission denied"),
            )
        }
    }
}

fn assert_tool_messages_answer_calls(messages: &[ModelMessage]) {
    let mut idx = 0;
    while idx < messages.len() {
        let calls = messages[idx].tool_calls();
        let answers = &messages[idx + 1..];
        for (call, answer) in calls.iter().zip(answers) {
            assert_eq!(answer.role(), Role::Tool);
            assert_eq!(answer.tool_call_id(), Some(call.id.as_str()));
        }
        if let Some(next) = answers.get(calls.len()) {
            assert_ne!(next.role(), Role::Tool, "unexpected tool message");
        }
        idx += 1 + calls.len();
    }
}

#[tokio::test]
async fn test_zero_max_steps() {
    let model_provider = TestModelProvider::default();
    let mut agent = AgentBuilder::with_model_provider(model_provider.clone())
        .with_max_steps(0)
        .build();
    assert_eq!(agent.state(), AgentState::Idle);

    let summary = agent.run("echo hello").await;

    assert_eq!(summary.steps(), 0);
    assert_eq!(summary.state(), AgentState::Finished);
    assert_eq!(summary.main_response(), NO_RESPONSE);
    assert_eq!(agent.state(), AgentState::Finished);
    assert_eq!(agent.memory().messages(), [ModelMessage::user("echo hello")]);
    assert!(model_provider.requests().is_empty());
}

#[tokio::test]
async fn test_finishes_without_tool_calls() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::with_content("Hi there!"));

    let mut agent = AgentBuilder::with_model_provider(model_provider.clone())
        .with_tool(EchoTool::new())
        .build();
    let summary = agent.run("Hello").await;

    assert_eq!(summary.steps(), 1);
    assert_eq!(summary.task(), "Hello");
    assert_eq!(summary.main_response(), "Hi there!");
    assert_eq!(agent.memory().len(), 2);
    assert_eq!(model_provider.requests().len(), 1);
}

#[tokio::test]
async fn test_tool_round_trip() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::with_tool_calls([tool_call(
        "call:1",
        "echo",
        r#"{"text":"hello\n"}"#,
    )]));
    model_provider.add_response(PresetResponse::with_content("done"));

    let mut agent = AgentBuilder::with_model_provider(model_provider.clone())
        .with_system_prompt("Be brief.")
        .with_tool(EchoTool::new())
        .build();
    let summary = agent.run("echo hello").await;

    assert_eq!(summary.steps(), 2);
    assert_eq!(summary.main_response(), "done");

    let messages = agent.memory().messages();
    let roles: Vec<Role> = messages.iter().map(ModelMessage::role).collect();
    assert_eq!(roles, [
        Role::User,
        Role::Assistant,
        Role::Tool,
        Role::Assistant
    ]);
    assert_eq!(messages[2], ModelMessage::tool("call:1", "hello\n"));
    assert_tool_messages_answer_calls(messages);

    let requests = model_provider.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.system_prompt.as_deref(), Some("Be brief."));
        assert_eq!(request.tools, agent.tools().schemas());
    }
    // The second think step sees the tool result.
    assert_eq!(requests[1].messages, messages[..3]);
}

#[tokio::test]
async fn test_failures_do_not_abort_batch() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::with_tool_calls([
        tool_call("call:1", "missing", "{}"),
        tool_call("call:2", "echo", "{oops"),
        tool_call("call:3", "broken", r#"{"mode":"panic"}"#),
        tool_call("call:4", "broken", r#"{"mode":"error"}"#),
        tool_call("call:5", "echo", r#"{"text":"still here"}"#),
    ]));
    model_provider.add_response(PresetResponse::with_content("done"));

    let mut agent = AgentBuilder::with_model_provider(model_provider)
        .with_tool(EchoTool::new())
        .with_tool(BrokenTool {
            schema: json!({ "type": "object" }),
        })
        .build();
    let summary = agent.run("try everything").await;
    assert_eq!(summary.steps(), 2);

    let messages = agent.memory().messages();
    assert_eq!(messages.len(), 8);
    assert_tool_messages_answer_calls(messages);

    let outputs: Vec<&str> = messages[2..7]
        .iter()
        .map(|msg| msg.content().unwrap())
        .collect();
    assert!(outputs[0].starts_with("Error: "));
    assert!(outputs[0].contains("missing"));
    assert!(outputs[1].starts_with("Error: Malformed arguments"));
    assert_eq!(outputs[2], "Error: broken beyond repair");
    assert_eq!(outputs[3], "Error: permission denied");
    assert_eq!(outputs[4], "still here");
}

#[tokio::test]
async fn test_budget_bounds_think_steps() {
    let mut model_provider = TestModelProvider::default();
    for idx in 0..3 {
        model_provider.add_response(
            PresetResponse::with_tool_calls([tool_call(
                &format!("call:{idx}"),
                "echo",
                r#"{"text":"again"}"#,
            )])
            .and_content(format!("attempt {idx}")),
        );
    }

    let mut agent = AgentBuilder::with_model_provider(model_provider.clone())
        .with_max_steps(2)
        .with_tool(EchoTool::new())
        .build();
    let summary = agent.run("loop forever").await;

    assert_eq!(summary.steps(), 2);
    assert_eq!(summary.state(), AgentState::Finished);
    assert_eq!(summary.main_response(), "attempt 1");
    assert_eq!(model_provider.requests().len(), 2);

    // The batch requested on the last step still runs.
    let messages = agent.memory().messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[4], ModelMessage::tool("call:1", "again"));
    assert_tool_messages_answer_calls(messages);
}

#[tokio::test]
async fn test_model_failure_finishes_run() {
    let mut model_provider = TestModelProvider::default();
    model_provider
        .add_response(PresetResponse::with_failure(ErrorKind::Authentication));

    let mut agent = AgentBuilder::with_model_provider(model_provider)
        .with_tool(EchoTool::new())
        .build();
    let summary = agent.run("anything").await;

    assert_eq!(summary.steps(), 1);
    assert_eq!(summary.state(), AgentState::Finished);
    assert!(summary.main_response().starts_with("Model call failed: "));
    assert_eq!(agent.memory().len(), 2);
}

#[tokio::test]
async fn test_empty_response_is_not_recorded() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::default());

    let mut agent = AgentBuilder::with_model_provider(model_provider).build();
    let summary = agent.run("say nothing").await;

    assert_eq!(summary.steps(), 1);
    assert_eq!(summary.main_response(), NO_RESPONSE);
    assert_eq!(agent.memory().len(), 1);
}

#[tokio::test]
async fn test_each_run_has_fresh_memory() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::with_content("ok"));

    let mut agent = AgentBuilder::with_model_provider(model_provider).build();
    agent.run("first").await;
    let summary = agent.run("second").await;

    assert_eq!(summary.task(), "second");
    assert_eq!(agent.memory().first_user_content(), Some("second"));
    assert_eq!(agent.memory().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_run_does_not_block_next_run() {
    let mut model_provider = TestModelProvider::default();
    model_provider.set_delay(Duration::from_secs(60));
    model_provider.add_response(PresetResponse::with_content("too late"));

    let mut agent = AgentBuilder::with_model_provider(model_provider).build();
    let abandoned = timeout(Duration::from_millis(10), agent.run("slow")).await;
    assert!(abandoned.is_err());
    assert_eq!(agent.state(), AgentState::Finished);
    assert_eq!(agent.memory().first_user_content(), Some("slow"));

    for _ in 0..2 {
        let summary = agent.run("retry").await;
        assert_eq!(summary.task(), "retry");
        assert_eq!(summary.steps(), 1);
        assert_eq!(summary.main_response(), "too late");
        assert_eq!(agent.state(), AgentState::Finished);
    }
}

#[tokio::test]
async fn test_events() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_response(PresetResponse::with_tool_calls([tool_call(
        "call:1",
        "echo",
        r#"{"text":"hi"}"#,
    )]));
    model_provider.add_response(PresetResponse::with_content("done"));

    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut agent = AgentBuilder::with_model_provider(model_provider)
        .with_tool(EchoTool::new())
        .on_event({
            let log = Arc::clone(&log);
            move |event| {
                let entry = match event {
                    AgentEvent::StepStarted { step, .. } => {
                        format!("step {step}")
                    }
                    AgentEvent::Thought { tool_calls, .. } => {
                        format!("thought ({} calls)", tool_calls.len())
                    }
                    AgentEvent::ToolStarted { call } => {
                        format!("start {}", call.name)
                    }
                    AgentEvent::ToolFinished { result, .. } => {
                        format!("finish {}", result.is_ok())
                    }
                    AgentEvent::Finished { summary } => {
                        format!("finished {}", summary.steps())
                    }
                };
                log.lock().unwrap().push(entry);
            }
        })
        .build();
    agent.run("say hi").await;

    assert_eq!(*log.lock().unwrap(), [
        "step 1",
        "thought (1 calls)",
        "start echo",
        "finish true",
        "step 2",
        "thought (0 calls)",
        "finished 2",
    ]);
}
