//! The Request Processor: the thin coordinator that turns one natural
//! language request into a finished workflow response. Ties together the
//! Intent Matcher, a configured `Planner`, and the `ExecutionEngine` — it
//! holds no planning or execution logic of its own.

use std::collections::BTreeSet;
use std::sync::Arc;

use conductor_core::{ConductorResult, PlanningMethod, WorkflowPlan};
use conductor_planner::{IntentMatch, KeywordMatcher, Planner};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::engine::{ExecutionEngine, WorkflowStatus};

/// The shaped, user-facing outcome of one `process_request` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestResponse {
    pub request: String,
    pub intent: String,
    pub confidence: f64,
    pub planning_method: PlanningMethod,
    pub planning_reason: String,
    pub workflow_id: String,
    pub status: WorkflowStatus,
    pub steps_total: usize,
    pub steps_completed: usize,
    pub results: std::collections::BTreeMap<String, Value>,
    pub summary: String,
    pub error: Option<String>,
}

/// Build a short, deterministic summary from what actually ran — never a
/// model call, just the agent/tool names the plan touched.
fn summarize(agents_touched: &BTreeSet<String>, steps_completed: usize, steps_total: usize, status: WorkflowStatus) -> String {
    let agent_list: Vec<&str> = agents_touched.iter().map(String::as_str).collect();
    match status {
        WorkflowStatus::Completed => format!(
            "Completed {steps_completed}/{steps_total} step(s) using: {}.",
            agent_list.join(", ")
        ),
        WorkflowStatus::Failed => format!(
            "Stopped after {steps_completed}/{steps_total} step(s); the remaining steps did not run."
        ),
        WorkflowStatus::Cancelled => format!(
            "Cancelled after {steps_completed}/{steps_total} step(s)."
        ),
        WorkflowStatus::Running => "Still running.".to_string(),
    }
}

/// Key a cached plan on the request text plus the sorted set of agents that
/// were available when it was planned — a later call with a different agent
/// set (one degraded out, say) must not reuse a stale plan.
type PlanCacheKey = (String, Vec<String>);

pub struct RequestProcessor {
    engine: Arc<ExecutionEngine>,
    matcher: KeywordMatcher,
    planner: Arc<dyn Planner>,
    /// `cache_enabled` memoization of identical `(text, agents)` plans
    /// (§6.3). `None` when disabled, so the lookup/insert path is skipped
    /// entirely rather than paying for an always-empty map.
    plan_cache: Option<DashMap<PlanCacheKey, WorkflowPlan>>,
}

impl RequestProcessor {
    pub fn new(engine: Arc<ExecutionEngine>, planner: Arc<dyn Planner>) -> Self {
        Self::with_cache(engine, planner, false)
    }

    pub fn with_cache(engine: Arc<ExecutionEngine>, planner: Arc<dyn Planner>, cache_enabled: bool) -> Self {
        Self {
            engine,
            matcher: KeywordMatcher::new(),
            planner,
            plan_cache: cache_enabled.then(DashMap::new),
        }
    }

    /// Classify, plan, and execute one request end to end.
    pub async fn process_request(&self, request: &str) -> ConductorResult<RequestResponse> {
        let intent: IntentMatch = self.matcher.match_intent(request);
        info!(intent = %intent.intent, confidence = intent.confidence, "matched intent");

        let available_agents = self.engine.list_available_agents();
        let mut plan = self.planned_workflow(request, &intent, &available_agents).await?;

        // The planner's workflow_id is a descriptive, per-route label, not
        // unique per call — mint a fresh id for the execution table so two
        // concurrent requests routed to the same plan shape don't collide.
        let planned_label = plan.workflow_id.clone();
        plan.workflow_id = Uuid::new_v4().to_string();

        let result = self
            .engine
            .execute_workflow(&plan, CancellationToken::new())
            .await;

        let agents_touched: BTreeSet<String> = plan.steps.iter().map(|s| s.agent.clone()).collect();
        let summary = summarize(&agents_touched, result.steps_completed, result.total_steps, result.status);

        Ok(RequestResponse {
            request: request.to_string(),
            intent: intent.intent,
            confidence: intent.confidence,
            planning_method: plan.planning_method,
            planning_reason: format!("[{planned_label}] {}", plan.planning_reason),
            workflow_id: result.workflow_id.clone(),
            status: result.status,
            steps_total: result.total_steps,
            steps_completed: result.steps_completed,
            results: result.results,
            summary,
            error: result.error,
        })
    }

    /// Look up a cached plan for this exact `(request, agents)` pair, or ask
    /// the planner and cache the result. A cache hit returns the same plan
    /// object the planner would have produced for identical input — the
    /// caller still mints a fresh workflow_id per call, so reuse is safe.
    async fn planned_workflow(
        &self,
        request: &str,
        intent: &IntentMatch,
        available_agents: &[String],
    ) -> ConductorResult<WorkflowPlan> {
        let Some(cache) = &self.plan_cache else {
            return self.planner.create_workflow(request, intent, available_agents).await;
        };

        let mut agents_sorted = available_agents.to_vec();
        agents_sorted.sort();
        let key = (request.to_string(), agents_sorted);

        if let Some(cached) = cache.get(&key) {
            return Ok(cached.clone());
        }

        let plan = self.planner.create_workflow(request, intent, available_agents).await?;
        cache.insert(key, plan.clone());
        Ok(plan)
    }
}
