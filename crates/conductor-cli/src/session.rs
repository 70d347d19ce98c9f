//! Wires together a `RuntimeConfig`, the default agent set, and the
//! configured planner family member into one `RequestProcessor`. The CLI's
//! only composition root — no business logic lives here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use conductor_core::AgentRegistry;
use conductor_planner::{
    AdaptiveMethod, AdaptivePlanner, HybridPlanner, HybridPrimary, ModelPlanner, Planner,
    RulePlanner, UnconfiguredModelClient,
};
use conductor_runtime::{agents::register_default_agents, ExecutionEngine, RequestProcessor, RuntimeConfig};

/// `enable_intelligent_routing = false` is a master switch that disables the
/// Adaptive/Hybrid/Model-backed routes entirely, regardless of
/// `default_planning_method` — every request takes the plain rule-based path.
fn build_planner(config: &RuntimeConfig) -> Arc<dyn Planner> {
    if !config.engine.enable_intelligent_routing {
        return Arc::new(RulePlanner::new());
    }

    let model_client = Arc::new(UnconfiguredModelClient);
    let learning = ModelPlanner::new(model_client.clone());
    let hybrid = HybridPlanner::new(HybridPrimary::Rule, ModelPlanner::new(model_client));

    match config.planner.default_planning_method.as_str() {
        "systematic" | "rule_based" | "rule-based" => Arc::new(RulePlanner::new()),
        "learning" | "ai" => Arc::new(ModelPlanner::new(Arc::new(UnconfiguredModelClient))),
        "hybrid" => Arc::new(hybrid),
        _ => Arc::new(AdaptivePlanner::new(AdaptiveMethod::Auto, learning, hybrid)),
    }
}

/// Everything one CLI invocation needs: the engine (for the Observable
/// Surface commands) and the processor built on top of it (for `run`).
pub struct Session {
    pub engine: Arc<ExecutionEngine>,
    pub processor: RequestProcessor,
}

/// Build a session with every illustrative agent initialized, ready to
/// serve a single CLI command. The CLI is stateless across invocations: a
/// `workflow status` call in a separate process will not see a workflow
/// started by an earlier `run` call, since nothing is persisted between them.
pub async fn build_session() -> Result<Session> {
    let config = RuntimeConfig::from_env();

    let mut registry = AgentRegistry::new();
    register_default_agents(&mut registry).context("registering default agents")?;

    let engine = Arc::new(ExecutionEngine::new(
        registry,
        config.engine.max_concurrent_workflows,
        Duration::from_secs(config.engine.default_step_timeout_seconds),
    ));

    let all_agent_names = vec![
        "system".to_string(),
        "energy-monitoring".to_string(),
        "portfolio-intelligence".to_string(),
        "energy-finance".to_string(),
        "document-processing".to_string(),
        "summarize".to_string(),
    ];
    engine
        .initialize_agents(&all_agent_names)
        .await
        .context("initializing agents")?;

    let planner = build_planner(&config);
    let processor = RequestProcessor::with_cache(engine.clone(), planner, config.engine.cache_enabled);
    Ok(Session { engine, processor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::PlanningMethod;

    fn config_with(default_planning_method: &str, enable_intelligent_routing: bool) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.planner.default_planning_method = default_planning_method.to_string();
        config.engine.enable_intelligent_routing = enable_intelligent_routing;
        config
    }

    #[tokio::test]
    async fn disabled_intelligent_routing_forces_rule_based_even_when_auto() {
        let config = config_with("auto", false);
        let planner = build_planner(&config);
        let plan = planner
            .create_workflow("what time is it", &conductor_planner::KeywordMatcher::new().match_intent("what time is it"), &["system".to_string()])
            .await
            .unwrap();
        assert_eq!(plan.planning_method, PlanningMethod::RuleBased);
    }

    #[tokio::test]
    async fn enabled_intelligent_routing_honors_hybrid_selection() {
        let config = config_with("hybrid", true);
        let planner = build_planner(&config);
        let plan = planner
            .create_workflow("what time is it", &conductor_planner::KeywordMatcher::new().match_intent("what time is it"), &["system".to_string()])
            .await
            .unwrap();
        // Relabeled by the Hybrid planner itself (its Rule-primary result),
        // not forced to RuleBased by the intelligent-routing toggle.
        assert_eq!(plan.planning_method, PlanningMethod::Hybrid);
    }
}
