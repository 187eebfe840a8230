use std::path::PathBuf;

use mini_agent_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// Return the content of a file.
    Read,
    /// Replace the content of a file, creating it when missing.
    Write,
    /// List the entries of a directory.
    List,
}

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileEditorToolParameters {
    #[schemars(description = "The operation to perform.")]
    action: FileAction,
    #[schemars(description = "The path of the file or directory.")]
    path: PathBuf,
    #[schemars(description = "The content to write. Only used by `write`.")]
    #[serde(default)]
    content: Option<String>,
}

/// A tool for reading, writing and listing files.
pub struct FileEditorTool {
    parameter_schema: Value,
}

impl FileEditorTool {
    /// Creates a new file editor tool.
    #[inline]
    pub fn new() -> Self {
        FileEditorTool {
            parameter_schema: schema_for!(FileEditorToolParameters).to_value(),
        }
    }
}

impl Default for FileEditorTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FileEditorTool {
    type Input = FileEditorToolParameters;

    fn name(&self) -> &str {
        "file_editor"
    }

    fn description(&self) -> &str {
        r#"
Reads, writes or lists files on the local filesystem.
- `read` returns the whole content of the file at `path`.
- `write` replaces the file at `path` with `content`.
- `list` returns the names of the entries in the directory at `path`, one per line."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: FileEditorToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            let FileEditorToolParameters {
                action,
                path,
                content,
            } = input;
            trace!("file_editor {action:?} {}", path.display());
            match action {
                FileAction::Read => read_file(path).await,
                FileAction::Write => {
                    write_file(path, content.unwrap_or_default()).await
                }
                FileAction::List => list_dir(path).await,
            }
        }
    }
}

async fn read_file(path: PathBuf) -> ToolResult {
    fs::read_to_string(&path).await.map_err(|err| {
        ToolError::execution_error()
            .with_reason(format!("Failed to read {}: {err}", path.display()))
    })
}

async fn write_file(path: PathBuf, content: String) -> ToolResult {
    fs::write(&path, content).await.map_err(|err| {
        ToolError::execution_error()
            .with_reason(format!("Failed to write {}: {err}", path.display()))
    })?;
    Ok(format!("File written: {}", path.display()))
}

async fn list_dir(path: PathBuf) -> ToolResult {
    let list_error = |err: std::io::Error| {
        ToolError::execution_error()
            .with_reason(format!("Failed to list {}: {err}", path.display()))
    };

    let metadata = fs::metadata(&path).await.map_err(list_error)?;
    if !metadata.is_dir() {
        return Err(ToolError::execution_error()
            .with_reason("path is not a directory"));
    }

    let mut names = vec![];
    let mut entries = fs::read_dir(&path).await.map_err(list_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mini_agent_core::tool::ErrorKind;

    fn params(
        action: FileAction,
        path: PathBuf,
        content: Option<&str>,
    ) -> FileEditorToolParameters {
        FileEditorToolParameters {
            action,
            path,
            content: content.map(ToOwned::to_owned),
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let tool = FileEditorTool::new();

        let output = tool
            .execute(params(FileAction::Write, path.clone(), Some("hi there")))
            .await
            .unwrap();
        assert_eq!(output, format!("File written: {}", path.display()));

        let output = tool
            .execute(params(FileAction::Read, path, None))
            .await
            .unwrap();
        assert_eq!(output, "hi there");
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let tool = FileEditorTool::new();

        let output = tool
            .execute(params(FileAction::List, dir.path().to_owned(), None))
            .await
            .unwrap();
        assert_eq!(output, "a.txt\nb.txt\nc");

        let err = tool
            .execute(params(FileAction::List, dir.path().join("c"), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert_eq!(err.reason(), "path is not a directory");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileEditorTool::new();
        let err = tool
            .execute(params(FileAction::Read, dir.path().join("nope"), None))
            .await
            .unwrap_err();
        assert!(err.reason().starts_with("Failed to read"));
    }

    #[test]
    fn test_parameters_shape() {
        let input: FileEditorToolParameters = serde_json::from_str(
            r#"{"action": "write", "path": "/tmp/x", "content": "y"}"#,
        )
        .unwrap();
        assert_eq!(input.action, FileAction::Write);
        assert_eq!(input.content.as_deref(), Some("y"));

        assert!(
            serde_json::from_str::<FileEditorToolParameters>(
                r#"{"action": "delete", "path": "/tmp/x"}"#,
            )
            .is_err()
        );
    }
}
