//! Conductor Core — foundation types and traits for the conductor orchestration
//! runtime.
//!
//! This crate defines the data model and agent contract shared by every other
//! crate in the workspace: the [`Agent`] trait, the tool contract
//! ([`Tool`], [`ToolOutput`], [`ToolError`]), the workflow plan types
//! ([`WorkflowPlan`], [`PlanStep`], [`PlaceholderRef`]), the agent registry,
//! and the closed [`ConductorError`] taxonomy. It contains no planning or
//! execution logic of its own.

pub mod agent;
pub mod error;
pub mod plan;
pub mod registry;
pub mod schema;
pub mod tool;

pub use agent::{Agent, AgentState};
pub use error::{ConductorError, ConductorResult, ErrorKind};
pub use plan::{PlaceholderRef, ParamValue, PlanStep, PlanningMethod, WorkflowPlan};
pub use registry::{AgentDescriptor, AgentFactory, AgentRegistry};
pub use schema::{InputSchema, ParamType, ParamSpec};
pub use tool::{SyncTool, Tool, ToolDescriptor, ToolError, ToolOutput, ToolParams};

/// Default per-step timeout when none is configured.
pub const DEFAULT_STEP_TIMEOUT_SECONDS: u64 = 30;

/// Default cross-workflow concurrency cap.
pub const DEFAULT_MAX_CONCURRENT_WORKFLOWS: usize = 10;
