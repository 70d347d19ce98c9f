//! The Agent Base Contract: `{Init, Tools, Invoke, Close}`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ConductorResult, ErrorKind};
use crate::tool::{Tool as _, ToolDescriptor, ToolError, ToolOutput, ToolParams};

/// Lifecycle state of an `AgentInstance`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Uninitialized,
    Ready,
    Degraded,
    Closed,
}

impl AgentState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Ready,
            2 => Self::Degraded,
            3 => Self::Closed,
            _ => Self::Uninitialized,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Ready => 1,
            Self::Degraded => 2,
            Self::Closed => 3,
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// A lock-free interior-mutability cell for `AgentState`, shared by concrete
/// agent implementations so `Agent::invoke`/`init`/`close` can run behind
/// `&self` while still observing each other's state transitions.
#[derive(Debug, Default)]
pub struct AgentStateCell(AtomicU8);

impl AgentStateCell {
    pub fn new(initial: AgentState) -> Self {
        Self(AtomicU8::new(initial.to_u8()))
    }

    pub fn get(&self) -> AgentState {
        AgentState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, state: AgentState) {
        self.0.store(state.to_u8(), Ordering::Release);
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

/// Every agent implements this capability set. The engine treats agents as
/// thread-safe black boxes: `invoke` takes `&self`, not `&mut self`, because
/// concurrent workflows may dispatch to the same agent instance
/// simultaneously and the engine does not serialize them.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable identifier, matching the name it was registered under.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> AgentState;

    /// Construct resources. On `DependencyUnavailable`, implementations may
    /// still transition to `Degraded` and register a reduced, dependency-free
    /// tool subset rather than returning `Err` — the engine only treats this
    /// as a hard failure if `state()` remains `Uninitialized` afterwards.
    async fn init(&self) -> ConductorResult<()>;

    /// Immutable view of the currently registered tool table. Reflects
    /// whatever subset `init` decided to expose (full set when `Ready`,
    /// a reduced set when `Degraded`).
    fn tools(&self) -> &HashMap<String, ToolDescriptor>;

    /// Dispatch a tool call by name. The default implementation looks the
    /// tool up in `tools()` and invokes its handler; most agents never need
    /// to override this.
    async fn invoke(&self, tool_name: &str, params: ToolParams) -> Result<ToolOutput, ToolError> {
        match self.tools().get(tool_name) {
            Some(descriptor) => {
                if let Err(e) = descriptor.input_schema.validate(&params) {
                    return Err(ToolError::invalid_argument(e.to_string()));
                }
                descriptor.handler.invoke(params).await
            }
            None => Err(ToolError::new(
                ErrorKind::UnknownTool,
                format!("agent '{}' has no tool named '{}'", self.name(), tool_name),
            )),
        }
    }

    /// Release resources. Must be safe to call more than once.
    async fn close(&self) -> ConductorResult<()>;
}
