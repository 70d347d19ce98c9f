//! The Execution Engine: runs a `WorkflowPlan` step by step against live
//! agent instances, resolving inter-step placeholders and recording
//! results under the `step_N` convention.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use conductor_core::{
    Agent, AgentRegistry, AgentState, ConductorError, ConductorResult, ParamValue, PlanStep,
    ToolParams, WorkflowPlan,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Lifecycle of one `ExecuteWorkflow` call, tracked in the execution table
/// so `GetWorkflowStatus` can be queried concurrently with the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Snapshot of a workflow's progress or final outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub status: WorkflowStatus,
    pub steps_completed: usize,
    pub total_steps: usize,
    pub started_at: DateTime<Utc>,
    /// `step_N` -> the step's decoded tool output, in completion order.
    pub results: BTreeMap<String, Value>,
    pub error: Option<String>,
}

impl WorkflowResult {
    fn running(workflow_id: String, total_steps: usize) -> Self {
        Self {
            workflow_id,
            status: WorkflowStatus::Running,
            steps_completed: 0,
            total_steps,
            started_at: Utc::now(),
            results: BTreeMap::new(),
            error: None,
        }
    }
}

/// Tool summary for the Observable Surface: name and description only, no
/// schema or handler detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// One entry of `ListAvailableAgents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub state: AgentState,
    pub tools: Vec<ToolSummary>,
}

/// The engine's `step_N` result key is 1-based and tracks a step's
/// *position* in the plan, not its `step_index` field — planners number
/// `PlanStep::step_index` from 0, but `PlaceholderRef`s are written as
/// `step_1.field`, `step_2.field`, ... against execution order.
fn step_key(position: usize) -> String {
    format!("step_{}", position + 1)
}

/// Resolve one step's bound parameters against the results recorded so far.
/// A placeholder whose target step or field hasn't produced output yet is
/// not a hard failure: it resolves to its own `step_N.field` literal text so
/// the step still runs (and most tools will simply echo back a string they
/// don't recognize rather than erroring on it).
fn resolve_params(step: &PlanStep, results: &BTreeMap<String, Value>) -> ToolParams {
    let mut params = ToolParams::new();
    for (name, value) in &step.parameters {
        let resolved = match value {
            ParamValue::Literal(v) => v.clone(),
            ParamValue::Placeholder(ph) => results
                .get(&ph.step_key)
                .and_then(|v| v.get(&ph.field))
                .cloned()
                .unwrap_or_else(|| Value::String(ph.as_literal())),
        };
        params.insert(name.clone(), resolved);
    }
    params
}

/// Runs workflows against a fixed set of initialized agent instances.
/// Holds no planning logic of its own — the Request Processor decides what
/// plan to run; the engine only knows how to run one.
pub struct ExecutionEngine {
    registry: AgentRegistry,
    instances: DashMap<String, Arc<dyn Agent>>,
    executions: DashMap<String, WorkflowResult>,
    concurrency: Arc<Semaphore>,
    step_timeout: Duration,
}

impl ExecutionEngine {
    pub fn new(registry: AgentRegistry, max_concurrent_workflows: usize, step_timeout: Duration) -> Self {
        Self {
            registry,
            instances: DashMap::new(),
            executions: DashMap::new(),
            concurrency: Arc::new(Semaphore::new(max_concurrent_workflows.max(1))),
            step_timeout,
        }
    }

    /// Construct and `init` each named agent, idempotently: an agent already
    /// present (by name) is left alone rather than reconstructed. An agent
    /// that stays `Uninitialized` after `init` is treated as unavailable.
    pub async fn initialize_agents(&self, names: &[String]) -> ConductorResult<()> {
        for name in names {
            if self.instances.contains_key(name) {
                continue;
            }
            let descriptor = self.registry.get(name)?;
            let agent = (descriptor.factory)()?;
            agent.init().await?;
            if agent.state() == AgentState::Uninitialized {
                return Err(ConductorError::dependency_unavailable(format!(
                    "agent '{name}' did not leave the uninitialized state"
                )));
            }
            info!(agent = %name, state = %agent.state(), "agent initialized");
            self.instances.insert(name.clone(), agent);
        }
        Ok(())
    }

    /// Names of every agent with a live, initialized instance.
    pub fn list_available_agents(&self) -> Vec<String> {
        self.instances.iter().map(|e| e.key().clone()).collect()
    }

    /// The Observable Surface's `ListAvailableAgents`: name, state, and
    /// tool catalogue for every initialized agent.
    pub fn agent_summaries(&self) -> Vec<AgentSummary> {
        self.instances
            .iter()
            .map(|entry| {
                let agent = entry.value();
                let tools = agent
                    .tools()
                    .values()
                    .map(|t| ToolSummary {
                        name: t.name.clone(),
                        description: t.description.clone(),
                    })
                    .collect();
                AgentSummary {
                    name: agent.name().to_string(),
                    state: agent.state(),
                    tools,
                }
            })
            .collect()
    }

    pub fn get_workflow_status(&self, workflow_id: &str) -> Option<WorkflowResult> {
        self.executions.get(workflow_id).map(|e| e.clone())
    }

    /// Run a plan to completion (or failure, or cancellation), recording
    /// progress in the execution table as each step finishes so a concurrent
    /// `GetWorkflowStatus` call observes a live view.
    pub async fn execute_workflow(
        &self,
        plan: &WorkflowPlan,
        cancellation: CancellationToken,
    ) -> WorkflowResult {
        let _permit = self.concurrency.acquire().await;
        let workflow_id = plan.workflow_id.clone();
        let mut result = WorkflowResult::running(workflow_id.clone(), plan.steps.len());
        self.executions.insert(workflow_id.clone(), result.clone());

        for (position, step) in plan.steps.iter().enumerate() {
            if cancellation.is_cancelled() {
                result.status = WorkflowStatus::Cancelled;
                result.error = Some("cancelled before step completion".to_string());
                warn!(%workflow_id, steps_completed = result.steps_completed, "workflow cancelled");
                break;
            }

            match self.run_step(step, &result.results).await {
                Ok(output) => {
                    result.results.insert(step_key(position), output);
                    result.steps_completed += 1;
                    self.executions.insert(workflow_id.clone(), result.clone());
                }
                Err(err) => {
                    result.status = WorkflowStatus::Failed;
                    result.error = Some(err.to_string());
                    warn!(%workflow_id, error = %err, step = step.step_index, "workflow step failed");
                    break;
                }
            }
        }

        if result.status == WorkflowStatus::Running {
            result.status = WorkflowStatus::Completed;
        }
        self.executions.insert(workflow_id.clone(), result.clone());
        result
    }

    async fn run_step(&self, step: &PlanStep, results: &BTreeMap<String, Value>) -> ConductorResult<Value> {
        let agent = self
            .instances
            .get(&step.agent)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ConductorError::unknown_agent(&step.agent))?;
        let params = resolve_params(step, results);

        let invocation = agent.invoke(&step.tool, params);
        let output = tokio::time::timeout(self.step_timeout, invocation)
            .await
            .map_err(|_| {
                ConductorError::deadline_exceeded(format!(
                    "step {} ({}::{}) exceeded {:?}",
                    step.step_index, step.agent, step.tool, self.step_timeout
                ))
            })??;

        if output.is_error() {
            let message = match &output {
                conductor_core::ToolOutput::Envelope { content, .. } => content
                    .first()
                    .map(|item| item.text.clone())
                    .unwrap_or_else(|| {
                        format!("step {} ({}::{}) returned an error envelope", step.step_index, step.agent, step.tool)
                    }),
                conductor_core::ToolOutput::Direct(_) => unreachable!("is_error is only true for Envelope"),
            };
            return Err(ConductorError::tool_failure(message));
        }

        Ok(output.as_object().map(Value::Object).unwrap_or(Value::Null))
    }

    /// `Close` every initialized agent, then clear both the instance and
    /// execution tables. Idempotent: calling this with no agents
    /// initialized (or calling it twice) is a no-op past the first pass,
    /// and a subsequent `initialize_agents` call succeeds normally.
    pub async fn shutdown(&self) {
        for entry in self.instances.iter() {
            if let Err(err) = entry.value().close().await {
                warn!(agent = %entry.key(), error = %err, "agent close failed during shutdown");
            }
        }
        self.instances.clear();
        self.executions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{register_default_agents, SystemAgent};
    use conductor_core::{Agent as _, AgentRegistry, PlanningMethod};
    use serde_json::json;
    use std::collections::HashMap;

    fn registry_with_system() -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        register_default_agents(&mut registry).unwrap();
        registry
    }

    #[tokio::test]
    async fn executes_single_step_workflow_to_completion() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();

        let step = PlanStep::new(1, "system", "get_current_time");
        let plan = WorkflowPlan::new("wf-1", PlanningMethod::RuleBased, "test", vec![step]);

        let result = engine.execute_workflow(&plan, CancellationToken::new()).await;
        assert_eq!(result.status, WorkflowStatus::Completed);
        assert_eq!(result.steps_completed, 1);
        assert!(result.results.contains_key("step_1"));
    }

    #[tokio::test]
    async fn unknown_agent_fails_the_workflow() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();

        let step = PlanStep::new(1, "ghost-agent", "do_something");
        let plan = WorkflowPlan::new("wf-2", PlanningMethod::RuleBased, "test", vec![step]);

        let result = engine.execute_workflow(&plan, CancellationToken::new()).await;
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn placeholder_resolves_against_prior_step_output() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string(), "energy-monitoring".to_string()]).await.unwrap();

        let step1 = PlanStep::new(1, "energy-monitoring", "get_latest_energy_reading");
        let step2 = PlanStep::new(2, "energy-monitoring", "analyze_usage_patterns")
            .with_param("scope", ParamValue::literal(json!("meter")))
            .with_param("identifier", ParamValue::placeholder("step_1", "meter_id"))
            .with_param("time_range", ParamValue::literal(json!({"start_date": "2025-01-01", "end_date": "2025-12-31"})));
        let plan = WorkflowPlan::new("wf-3", PlanningMethod::RuleBased, "test", vec![step1, step2]);

        let result = engine.execute_workflow(&plan, CancellationToken::new()).await;
        assert_eq!(result.status, WorkflowStatus::Completed);
        let step2_output = result.results.get("step_2").unwrap();
        assert_eq!(step2_output.get("identifier"), Some(&json!("meter-0042")));
    }

    #[tokio::test]
    async fn cancellation_stops_before_the_next_step() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let step = PlanStep::new(1, "system", "get_current_time");
        let plan = WorkflowPlan::new("wf-4", PlanningMethod::RuleBased, "test", vec![step]);

        let result = engine.execute_workflow(&plan, token).await;
        assert_eq!(result.status, WorkflowStatus::Cancelled);
        assert_eq!(result.steps_completed, 0);
    }

    #[tokio::test]
    async fn initialize_agents_is_idempotent_by_name() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        assert_eq!(engine.list_available_agents(), vec!["system".to_string()]);
    }

    #[tokio::test]
    async fn list_available_agents_reflects_initialization() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        assert!(engine.list_available_agents().is_empty());
        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        assert_eq!(engine.list_available_agents(), vec!["system".to_string()]);
    }

    #[test]
    fn system_agent_name_matches_registry_key() {
        let agent = SystemAgent::new();
        assert_eq!(agent.name(), "system");
    }

    #[tokio::test]
    async fn agent_summaries_include_tool_catalogue() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        let summaries = engine.agent_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "system");
        assert!(summaries[0].tools.iter().any(|t| t.name == "get_current_time"));
    }

    /// An agent with a single tool that always reports failure through an
    /// error envelope, used to exercise `run_step`'s `is_error()` check.
    struct FailingAgent {
        tools: HashMap<String, conductor_core::ToolDescriptor>,
    }

    impl FailingAgent {
        fn new() -> Self {
            use conductor_core::{InputSchema, SyncTool, ToolDescriptor, ToolOutput};

            let handler = SyncTool::new(|_params| Ok(ToolOutput::envelope_error("simulated downstream failure")));
            let mut tools = HashMap::new();
            tools.insert(
                "always_fails".to_string(),
                ToolDescriptor::new("always_fails", "always reports an error envelope", InputSchema::new(vec![]), Arc::new(handler)),
            );
            Self { tools }
        }
    }

    #[async_trait::async_trait]
    impl Agent for FailingAgent {
        fn name(&self) -> &str {
            "failing-agent"
        }

        fn state(&self) -> AgentState {
            AgentState::Ready
        }

        async fn init(&self) -> ConductorResult<()> {
            Ok(())
        }

        fn tools(&self) -> &HashMap<String, conductor_core::ToolDescriptor> {
            &self.tools
        }

        async fn close(&self) -> ConductorResult<()> {
            Ok(())
        }
    }

    fn registry_with_failing_agent() -> AgentRegistry {
        let mut registry = registry_with_system();
        registry
            .register("failing-agent", Arc::new(|| Ok(Arc::new(FailingAgent::new()) as Arc<dyn Agent>)), vec![])
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn error_envelope_fails_the_workflow_with_the_tool_s_message() {
        let engine = ExecutionEngine::new(registry_with_failing_agent(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["failing-agent".to_string()]).await.unwrap();

        let step = PlanStep::new(1, "failing-agent", "always_fails");
        let plan = WorkflowPlan::new("wf-5", PlanningMethod::RuleBased, "test", vec![step]);

        let result = engine.execute_workflow(&plan, CancellationToken::new()).await;
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(result.steps_completed, 0);
        let error = result.error.unwrap();
        assert!(error.contains("simulated downstream failure"), "error was: {error}");
    }

    #[tokio::test]
    async fn shutdown_clears_instances_and_is_idempotent_then_reinitializes() {
        let engine = ExecutionEngine::new(registry_with_system(), 4, Duration::from_secs(5));
        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        assert_eq!(engine.list_available_agents(), vec!["system".to_string()]);

        engine.shutdown().await;
        assert!(engine.list_available_agents().is_empty());

        // Idempotent: a second call with no instances left is a no-op, not an error.
        engine.shutdown().await;
        assert!(engine.list_available_agents().is_empty());

        engine.initialize_agents(&["system".to_string()]).await.unwrap();
        assert_eq!(engine.list_available_agents(), vec!["system".to_string()]);
    }
}
