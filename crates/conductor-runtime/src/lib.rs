//! Conductor Runtime — the Execution Engine, the Request Processor, layered
//! configuration, and a set of illustrative domain agents built on top of
//! `conductor-core`'s agent/tool contract and `conductor-planner`'s planner
//! family.

pub mod agents;
pub mod config;
pub mod engine;
pub mod request_processor;

pub use config::{EngineConfig, PlannerConfig, RuntimeConfig};
pub use engine::{AgentSummary, ExecutionEngine, ToolSummary, WorkflowResult, WorkflowStatus};
pub use request_processor::{RequestProcessor, RequestResponse};
