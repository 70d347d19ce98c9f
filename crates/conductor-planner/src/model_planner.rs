//! The Model (Learning-Based) Planner: delegates plan synthesis to an
//! external model, falling back to the Rule Planner on any failure.

use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{ConductorResult, PlanningMethod, WorkflowPlan};
use tracing::warn;

use crate::matcher::IntentMatch;
use crate::model_client::ModelClient;
use crate::planner::Planner;
use crate::rule_planner::RulePlanner;

/// The known agent/tool pairing the Rule Planner routes against (see §2a).
/// Shared by `tools_description` (what the model is told exists) and
/// `is_valid` (what a model response is allowed to reference) so the two
/// can never drift apart.
type Catalogue = &'static [(&'static str, &'static [(&'static str, &'static str)])];

fn catalogue() -> Catalogue {
    &[
        (
            "energy-monitoring",
            &[
                ("get_latest_energy_reading", "Get the most recent energy usage reading"),
                ("process_meter_data", "Process real-time meter data with anomaly detection"),
                ("analyze_usage_patterns", "Analyze energy consumption patterns for buildings"),
            ],
        ),
        (
            "energy-finance",
            &[
                ("calculate_project_roi", "Calculate ROI for energy efficiency projects"),
                ("optimize_eaas_contract", "Optimize Energy-as-a-Service contract terms"),
            ],
        ),
        (
            "portfolio-intelligence",
            &[
                ("identify_optimization_opportunities", "Find energy optimization opportunities across a portfolio"),
                ("search_facilities", "Search for facilities matching criteria"),
                ("analyze_portfolio_energy_usage", "Analyze energy usage across a portfolio"),
                ("benchmark_portfolio_performance", "Benchmark a portfolio against industry performance"),
                ("generate_sustainability_report", "Generate a sustainability report for a portfolio"),
            ],
        ),
        (
            "document-processing",
            &[("extract_text", "Extract text from a document")],
        ),
        (
            "summarize",
            &[("summarize_text", "Summarize extracted text")],
        ),
        (
            "system",
            &[
                ("get_current_time", "Get current date and time"),
                ("scope_check", "Check whether a request is within system scope"),
            ],
        ),
    ]
}

/// Renders the tool catalogue a model backend needs to emit a valid plan
/// without any further domain knowledge, grounded in the same agent/tool
/// pairing the Rule Planner routes against (see §2a).
fn tools_description(available_agents: &[String]) -> String {
    let mut description = String::from("Available agents and their tools:\n");
    for (agent, tools) in catalogue() {
        if !available_agents.iter().any(|a| a == agent) {
            continue;
        }
        description.push_str(&format!("\n{agent}:\n"));
        for (tool, doc) in *tools {
            description.push_str(&format!("  - {tool}: {doc}\n"));
        }
    }
    description
}

/// Whether `agent` is both in `available_agents` and, per the catalogue,
/// actually carries a tool named `tool`. A model response can only be
/// trusted to dispatch against agents/tools the engine actually has live.
fn agent_tool_available(agent: &str, tool: &str, available_agents: &[String]) -> bool {
    if !available_agents.iter().any(|a| a == agent) {
        return false;
    }
    catalogue()
        .iter()
        .find(|(name, _)| *name == agent)
        .map(|(_, tools)| tools.iter().any(|(t, _)| *t == tool))
        .unwrap_or(false)
}

fn prompt_for(request: &str, available_agents: &[String]) -> String {
    format!("{}\n\n{}", request, tools_description(available_agents))
}

/// Validates the parsed plan carries `workflow_id` and at least one step,
/// each naming an agent/tool pair that is actually available to dispatch
/// against — a model hallucinating an unregistered agent or nonexistent
/// tool must trigger the same rule-based fallback as malformed JSON.
fn is_valid(plan: &WorkflowPlan, available_agents: &[String]) -> bool {
    if plan.workflow_id.is_empty() || plan.steps.is_empty() {
        return false;
    }
    plan.steps
        .iter()
        .all(|s| !s.agent.is_empty() && !s.tool.is_empty() && agent_tool_available(&s.agent, &s.tool, available_agents))
}

/// Consults a `ModelClient`; on missing credentials, network failure,
/// timeout, or unparseable/invalid JSON, falls back to the Rule Planner and
/// annotates the returned plan's method/reason with the fallback cause.
pub struct ModelPlanner {
    client: Arc<dyn ModelClient>,
    fallback: RulePlanner,
}

impl ModelPlanner {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            fallback: RulePlanner::new(),
        }
    }

    async fn fallback_plan(
        &self,
        request: &str,
        intent: &IntentMatch,
        available_agents: &[String],
        reason: String,
    ) -> ConductorResult<WorkflowPlan> {
        warn!(%reason, "model planner falling back to rule planner");
        let mut plan = self
            .fallback
            .create_workflow(request, intent, available_agents)
            .await?;
        plan.planning_method = PlanningMethod::RuleBased;
        plan.planning_reason = reason;
        Ok(plan)
    }
}

#[async_trait]
impl Planner for ModelPlanner {
    async fn create_workflow(
        &self,
        request: &str,
        intent: &IntentMatch,
        available_agents: &[String],
    ) -> ConductorResult<WorkflowPlan> {
        let prompt = prompt_for(request, available_agents);

        let response = match self.client.generate(&prompt).await {
            Ok(response) => response,
            Err(err) => {
                return self
                    .fallback_plan(
                        request,
                        intent,
                        available_agents,
                        format!("model call failed ({err}), fell back to rule-based planning"),
                    )
                    .await;
            }
        };

        let parsed: Result<WorkflowPlan, _> = serde_json::from_str(&response);
        match parsed {
            Ok(mut plan) if is_valid(&plan, available_agents) => {
                plan.planning_method = PlanningMethod::LearningBased;
                plan.planning_reason = "learning-based planner generated workflow plan".to_string();
                Ok(plan)
            }
            Ok(_) => {
                self.fallback_plan(
                    request,
                    intent,
                    available_agents,
                    "model response parsed but failed plan validation, fell back to rule-based planning".to_string(),
                )
                .await
            }
            Err(_) => {
                self.fallback_plan(
                    request,
                    intent,
                    available_agents,
                    "model response was not valid JSON, fell back to rule-based planning".to_string(),
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::KeywordMatcher;
    use crate::model_client::testing::FixedModelClient;
    use crate::model_client::{ModelClientError, UnconfiguredModelClient};

    fn agents() -> Vec<String> {
        vec!["system".into(), "energy-monitoring".into()]
    }

    #[tokio::test]
    async fn missing_credentials_falls_back_to_rule_based() {
        let planner = ModelPlanner::new(Arc::new(UnconfiguredModelClient));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
        assert!(plan.planning_reason.contains("fell back"));
    }

    #[tokio::test]
    async fn non_json_response_falls_back_to_rule_based() {
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::ok("not json at all")));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }

    #[tokio::test]
    async fn invalid_plan_shape_falls_back_to_rule_based() {
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::ok(r#"{"workflow_id": "w1", "steps": []}"#)));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }

    #[tokio::test]
    async fn valid_model_plan_is_accepted_as_is() {
        let valid = r#"{
            "workflow_id": "model_plan_1",
            "planning_method": "learning_based",
            "planning_reason": "placeholder",
            "steps": [{"step_index": 0, "agent": "system", "tool": "get_current_time", "parameters": {}}]
        }"#;
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::ok(valid)));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::LearningBased);
        assert_eq!(plan.workflow_id, "model_plan_1");
    }

    #[tokio::test]
    async fn plan_referencing_unavailable_agent_falls_back_to_rule_based() {
        let hallucinated = r#"{
            "workflow_id": "model_plan_2",
            "planning_method": "learning_based",
            "planning_reason": "placeholder",
            "steps": [{"step_index": 0, "agent": "weather-agent", "tool": "get_forecast", "parameters": {}}]
        }"#;
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::ok(hallucinated)));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }

    #[tokio::test]
    async fn plan_referencing_unregistered_tool_on_a_real_agent_falls_back_to_rule_based() {
        let hallucinated = r#"{
            "workflow_id": "model_plan_3",
            "planning_method": "learning_based",
            "planning_reason": "placeholder",
            "steps": [{"step_index": 0, "agent": "system", "tool": "delete_everything", "parameters": {}}]
        }"#;
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::ok(hallucinated)));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }

    #[tokio::test]
    async fn request_error_falls_back_to_rule_based() {
        let planner = ModelPlanner::new(Arc::new(FixedModelClient::err(ModelClientError::Timeout)));
        let intent = KeywordMatcher::new().match_intent("what time is it");
        let plan = planner.create_workflow("what time is it", &intent, &agents()).await.unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }
}
