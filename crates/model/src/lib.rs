//! The contract between the agent loop and the language models it talks to.
//!
//! This crate establishes an unified protocol for the agent to interact
//! with various model services, so that the agent can seamlessly switch
//! between them without modifying the core codebase. The message types
//! defined here serialize to the chat-completion wire shape, which is
//! what most model services expect.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
