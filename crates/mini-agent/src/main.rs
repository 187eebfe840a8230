//! A simple program demonstrates how to use `mini-agent` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mini_agent::SessionBuilder;
use mini_agent::core::{AgentEvent, RunSummary};
use mini_agent_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;

/// Owned copy of an [`AgentEvent`] that can cross the channel.
enum CliEvent {
    Step(usize, usize),
    Thought(Option<String>, Vec<String>),
    ToolFinished(String, Result<String, String>),
}

const BAR_CHAR: &str = "▎";
const MAX_OUTPUT_CHARS: usize = 400;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };

    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config_builder = config_builder.with_model(model);
    }
    let config = config_builder.build();
    info!("using model {} at {}", config.model(), config.base_url());
    let model_provider = OpenAIProvider::new(config);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session_builder = SessionBuilder::with_model_provider(
        model_provider,
    )
    .on_event(move |event| {
        if let Some(event) = to_cli_event(event) {
            event_tx.send(event).ok();
        }
    });
    if let Some(max_steps) = max_steps_from_env() {
        session_builder = session_builder.with_max_steps(max_steps);
    }
    let mut session = session_builder.build();

    let Ok(progress_style) = ProgressStyle::with_template("{spinner} {wide_msg}")
    else {
        error!("invalid progress bar template");
        return;
    };
    let progress_style = progress_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut stdin = io::BufReader::new(io::stdin());
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let task = line.trim();
        if task.is_empty() {
            continue;
        }
        if matches!(task, "quit" | "exit" | "q") {
            break;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let mut run = pin!(session.run(task));
        let summary = loop {
            select! {
                biased;
                Some(event) = event_rx.recv() => {
                    progress_bar.suspend(|| render_event(&event));
                    if let CliEvent::Step(step, max_steps) = event {
                        progress_bar.set_message(format!(
                            "🤔 Thinking... (step {step}/{max_steps})"
                        ));
                    }
                }
                summary = &mut run => break summary,
            }
        };
        progress_bar.finish_and_clear();

        while let Ok(event) = event_rx.try_recv() {
            render_event(&event);
        }

        render_summary(&summary);
    }
}

fn to_cli_event(event: &AgentEvent<'_>) -> Option<CliEvent> {
    let event = match event {
        AgentEvent::StepStarted { step, max_steps } => {
            CliEvent::Step(*step, *max_steps)
        }
        AgentEvent::Thought {
            content,
            tool_calls,
        } => CliEvent::Thought(
            content.map(ToOwned::to_owned),
            tool_calls.iter().map(|call| call.name.clone()).collect(),
        ),
        AgentEvent::ToolFinished { call, result } => CliEvent::ToolFinished(
            call.name.clone(),
            (*result).clone().map_err(|err| err.to_string()),
        ),
        AgentEvent::ToolStarted { .. } | AgentEvent::Finished { .. } => {
            return None;
        }
    };
    Some(event)
}

fn render_event(event: &CliEvent) {
    match event {
        CliEvent::Step(step, max_steps) => {
            debug!("step {step}/{max_steps}");
        }
        CliEvent::Thought(content, tool_names) => {
            if let Some(content) = content {
                println!("{}🤖 {}", BAR_CHAR.bright_cyan(), content.bright_white());
            }
            for name in tool_names {
                println!("{}🔧 {}", BAR_CHAR.bright_yellow(), name.bold());
            }
        }
        CliEvent::ToolFinished(name, Ok(output)) => {
            println!(
                "{}✅ {name}: {}",
                BAR_CHAR.bright_green(),
                truncate(output.trim_end()).dimmed()
            );
        }
        CliEvent::ToolFinished(name, Err(reason)) => {
            println!(
                "{}❌ {name}: {}",
                BAR_CHAR.bright_red(),
                truncate(reason.trim_end()).red()
            );
        }
    }
}

fn render_summary(summary: &RunSummary) {
    println!();
    for line in summary.to_string().lines() {
        println!("{}{}", BAR_CHAR.bright_magenta(), line);
    }
    println!();
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_OUTPUT_CHARS) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

fn max_steps_from_env() -> Option<usize> {
    let value = env::var("MINI_AGENT_MAX_STEPS").ok()?;
    match value.parse() {
        Ok(max_steps) => Some(max_steps),
        Err(err) => {
            warn!("ignoring MINI_AGENT_MAX_STEPS={value}: {err}");
            None
        }
    }
}

async fn read_line<R: AsyncBufReadExt + Unpin>(stdin: &mut R) -> Option<String> {
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
