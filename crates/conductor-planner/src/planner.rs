//! The `Planner` capability every family member implements.

use async_trait::async_trait;
use conductor_core::ConductorResult;
use conductor_core::WorkflowPlan;

use crate::matcher::IntentMatch;

/// Produces a `WorkflowPlan` from a request, the matcher's classification,
/// and the set of agent names currently available to route against.
/// Implementations never fail outright: every documented failure mode
/// (missing credentials, unparseable model output, no agents) is handled by
/// falling back to a plan that explains itself in `planning_reason`, per
/// §4.4 of the orchestration design.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn create_workflow(
        &self,
        request: &str,
        intent: &IntentMatch,
        available_agents: &[String],
    ) -> ConductorResult<WorkflowPlan>;
}
