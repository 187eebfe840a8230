//! A set of built-in tools that models can use.

mod bash;
mod file_editor;
mod python;

pub use bash::BashTool;
pub use file_editor::FileEditorTool;
pub use python::PythonTool;
