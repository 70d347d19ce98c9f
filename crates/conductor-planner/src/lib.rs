//! Intent matching and the pluggable planner family: the part of the
//! runtime that turns a request plus an `IntentMatch` into a concrete
//! `WorkflowPlan`.

pub mod adaptive_planner;
pub mod entities;
pub mod hybrid_planner;
pub mod matcher;
pub mod model_client;
pub mod model_planner;
pub mod planner;
pub mod rule_planner;

pub use adaptive_planner::{AdaptivePlanner, Method as AdaptiveMethod};
pub use hybrid_planner::{HybridPlanner, Primary as HybridPrimary};
pub use matcher::{IntentMatch, KeywordMatcher};
pub use model_client::{ModelClient, ModelClientError, UnconfiguredModelClient};
pub use model_planner::ModelPlanner;
pub use planner::Planner;
pub use rule_planner::RulePlanner;
