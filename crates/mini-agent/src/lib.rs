//! An out-of-the-box agent that can run shell commands, Python snippets and
//! edit files to get a task done.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring agent functionality into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder, default_system_prompt};

/// Re-exports of [`mini_agent_core`] crate.
pub mod core {
    pub use mini_agent_core::*;
}
