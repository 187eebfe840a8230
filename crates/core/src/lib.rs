//! Core logic including the agent loop, its memory, and tool dispatch.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod memory;
mod model_client;
pub mod tool;

pub use agent::{
    Agent, AgentBuilder, AgentEvent, AgentState, NO_RESPONSE,
    RunSummary,
};
pub use model_client::{ModelClient, ModelClientResponse};
