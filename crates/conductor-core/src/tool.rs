//! The Tool Contract: the uniform capability every agent exposes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorKind;
use crate::schema::InputSchema;

/// `params: map[str -> any]` passed to a tool handler.
pub type ToolParams = serde_json::Map<String, Value>;

/// A named operation with a declared parameter schema and a handler.
///
/// `invoke` is always `async`; a handler with no suspension points is simply
/// one whose body never awaits, which is how the engine treats synchronous
/// and asynchronous handlers uniformly (see [`SyncTool`] for an adapter that
/// wraps a plain function).
#[async_trait]
pub trait Tool: Send + Sync {
    async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError>;
}

/// Adapts a synchronous handler function to the [`Tool`] trait, so the
/// engine never has to special-case sync vs. async tools.
pub struct SyncTool<F>(F)
where
    F: Fn(ToolParams) -> Result<ToolOutput, ToolError> + Send + Sync;

impl<F> SyncTool<F>
where
    F: Fn(ToolParams) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Tool for SyncTool<F>
where
    F: Fn(ToolParams) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
        (self.0)(params)
    }
}

/// Declared shape of a tool: its name, description, parameter schema, and
/// the handler that implements it. Stored by value in an agent's tool
/// table; cloning shares the underlying handler via `Arc`.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub handler: Arc<dyn Tool>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        handler: Arc<dyn Tool>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    pub async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
        self.handler.invoke(params).await
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Content item of an [`ToolOutput::Envelope`], mirroring the MCP-style
/// tool-result wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub text: String,
}

/// A tool's result, accepted by the engine in either of two wire shapes
/// without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// `{ "content": [ { "text": "<json>" } ], "isError": bool }`
    Envelope {
        content: Vec<ContentItem>,
        #[serde(rename = "isError", default)]
        is_error: bool,
    },
    /// `{ <field>: <value>, ... }`
    Direct(serde_json::Map<String, Value>),
}

impl ToolOutput {
    /// Wrap a direct result map.
    pub fn direct(fields: serde_json::Map<String, Value>) -> Self {
        Self::Direct(fields)
    }

    /// Build a success envelope carrying `value` JSON-encoded as the text
    /// payload, the shape long-running/out-of-process tool hosts use.
    pub fn envelope_success(value: &Value) -> Self {
        Self::Envelope {
            content: vec![ContentItem {
                text: serde_json::to_string(value).unwrap_or_default(),
            }],
            is_error: false,
        }
    }

    /// Build an error envelope carrying `message` as the text payload.
    pub fn envelope_error(message: impl Into<String>) -> Self {
        Self::Envelope {
            content: vec![ContentItem { text: message.into() }],
            is_error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Envelope { is_error: true, .. })
    }

    /// Normalize either wire shape down to a plain JSON object, decoding the
    /// envelope's text payload if necessary. Used by both the Request
    /// Processor (to shape the final response) and placeholder resolution.
    pub fn as_object(&self) -> Option<serde_json::Map<String, Value>> {
        match self {
            Self::Direct(map) => Some(map.clone()),
            Self::Envelope { content, .. } => {
                let text = content.first()?.text.as_str();
                match serde_json::from_str::<Value>(text).ok()? {
                    Value::Object(map) => Some(map),
                    _ => None,
                }
            }
        }
    }

    /// Look up a top-level field, decoding an envelope first. Used by
    /// `PlaceholderRef` resolution.
    pub fn get_field(&self, field: &str) -> Option<Value> {
        self.as_object()?.get(field).cloned()
    }
}

/// Tagged kind plus human message, returned by a tool handler on failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ToolFailure, message)
    }

    pub fn dependency_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DependencyUnavailable, message)
    }
}

impl From<ToolError> for crate::error::ConductorError {
    fn from(err: ToolError) -> Self {
        match err.kind {
            ErrorKind::InvalidArgument => Self::invalid_argument(err.message),
            ErrorKind::DependencyUnavailable => Self::dependency_unavailable(err.message),
            ErrorKind::UnknownTool => Self::unknown_tool(err.message),
            ErrorKind::UnknownAgent => Self::unknown_agent(err.message),
            ErrorKind::DeadlineExceeded => Self::deadline_exceeded(err.message),
            ErrorKind::Cancelled => Self::cancelled(err.message),
            ErrorKind::PlanInvalid => Self::plan_invalid(err.message),
            ErrorKind::ConfigError => Self::config(err.message),
            ErrorKind::DuplicateAgent => Self::duplicate_agent(err.message),
            ErrorKind::ToolFailure => Self::tool_failure(err.message),
        }
    }
}
