use std::pin::Pin;

use mini_agent_model::ModelTool;
use serde_json::{Map, Value};

use super::{Error, Tool, ToolResult};

pub(crate) type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Object-safe face of a [`Tool`], erasing its input type.
pub(crate) trait ToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn descriptor(&self) -> ModelTool;

    /// Decodes the raw argument blob into the tool's input and returns the
    /// execution future, without polling it.
    fn prepare(&self, arguments: &str) -> Result<ToolFuture, Error>;
}

pub(crate) struct ToolObjectImpl<T: Tool>(pub T);

impl<T: Tool> ToolObject for ToolObjectImpl<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    fn descriptor(&self) -> ModelTool {
        ModelTool {
            name: self.0.name().to_owned(),
            description: self.0.description().to_owned(),
            parameters: self.0.parameter_schema().clone(),
        }
    }

    fn prepare(&self, arguments: &str) -> Result<ToolFuture, Error> {
        let arguments = parse_arguments(arguments)?;
        trace!("decoding args for `{}`: {arguments:?}", self.0.name());
        let input: T::Input = serde_json::from_value(arguments)
            .map_err(|err| Error::invalid_input().with_reason(err.to_string()))?;
        Ok(Box::pin(self.0.execute(input)))
    }
}

/// Parses an argument blob, which must be a JSON object. A blank blob
/// stands for an empty object.
fn parse_arguments(blob: &str) -> Result<Value, Error> {
    if blob.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str(blob) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(Error::invalid_input()
            .with_reason("Arguments must be a JSON object")),
        Err(err) => Err(Error::invalid_input()
            .with_reason(format!("Malformed arguments: {err}"))),
    }
}
