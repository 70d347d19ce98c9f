//! The Rule Planner: deterministic routing from intent + entity extraction
//! to a concrete `WorkflowPlan`. No I/O, no model calls — every decision is
//! keyword/regex-driven and is named in `planning_reason`.

use async_trait::async_trait;
use conductor_core::{ConductorResult, ParamValue, PlanStep, PlanningMethod, WorkflowPlan};
use serde_json::{json, Value};

use crate::entities::{
    date_range, detect_building_id, detect_investment_amount, detect_portfolio,
    detect_project_type, detect_time_period,
};
use crate::matcher::IntentMatch;
use crate::planner::Planner;

fn step(index: usize, agent: &str, tool: &str, params: Value) -> PlanStep {
    let mut plan_step = PlanStep::new(index, agent, tool);
    if let Value::Object(map) = params {
        for (key, value) in map {
            plan_step = plan_step.with_param(key, ParamValue::from(value));
        }
    }
    plan_step
}

/// Deterministic, keyword-driven planner. Holds no state; safe to share
/// across concurrent requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RulePlanner;

impl RulePlanner {
    pub fn new() -> Self {
        Self
    }

    fn out_of_scope_plan(&self, intent: &IntentMatch) -> WorkflowPlan {
        WorkflowPlan::new(
            "out_of_scope_workflow",
            PlanningMethod::RuleBased,
            format!(
                "out-of-scope query detected via keyword matcher. intent: '{}', confidence: {:.2}. reason: {}. system domain: Energy-as-a-Service (EaaS) portfolio management and optimization.",
                intent.intent, intent.confidence, intent.reason
            ),
            vec![step(
                0,
                "system",
                "scope_check",
                json!({
                    "scope": "out_of_bounds",
                    "system_domain": "Energy-as-a-Service (EaaS) portfolio management and optimization",
                    "supported_topics": ["energy consumption", "portfolio analysis", "financial optimization", "document processing", "time/date"],
                    "unsupported_topics": ["historical facts", "politics", "general knowledge", "weather", "sports", "cooking", "geography"],
                    "recommendation": "Please ask questions related to energy portfolio management, building optimization, financial analysis, or document processing."
                }),
            )],
        )
    }

    fn energy_monitoring_date_plan(&self, intent: &IntentMatch) -> WorkflowPlan {
        WorkflowPlan::new(
            "energy_monitoring_date_workflow",
            PlanningMethod::RuleBased,
            format!(
                "energy-specific date query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. routing to energy-monitoring agent for latest reading data.",
                intent.intent, intent.confidence, intent.all_matches
            ),
            vec![step(
                0,
                "energy-monitoring",
                "get_latest_energy_reading",
                json!({ "include_details": true }),
            )],
        )
    }

    fn time_plan(&self, intent: &IntentMatch) -> WorkflowPlan {
        WorkflowPlan::new(
            "time_analysis_workflow",
            PlanningMethod::RuleBased,
            format!(
                "general time/date query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. routing to system agent for current time information.",
                intent.intent, intent.confidence, intent.all_matches
            ),
            vec![step(
                0,
                "system",
                "get_current_time",
                json!({ "timezone": "America/Denver" }),
            )],
        )
    }

    fn energy_plan(&self, request_lower: &str, intent: &IntentMatch) -> WorkflowPlan {
        let building_id = detect_building_id(request_lower);
        let period = detect_time_period(request_lower);
        let range = date_range(period);

        WorkflowPlan::new(
            "energy_analysis_workflow",
            PlanningMethod::RuleBased,
            format!(
                "energy analysis query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. building id extracted: '{}'. time period detected: '{}' ({} to {}). routing to energy-monitoring agent for usage pattern analysis and portfolio-intelligence agent for optimization opportunities.",
                intent.intent, intent.confidence, intent.all_matches, building_id, period, range.start_date, range.end_date
            ),
            vec![
                step(
                    0,
                    "energy-monitoring",
                    "analyze_usage_patterns",
                    json!({
                        "scope": "building",
                        "identifier": building_id,
                        "time_range": { "start_date": range.start_date, "end_date": range.end_date },
                    }),
                ),
                step(
                    1,
                    "portfolio-intelligence",
                    "identify_optimization_opportunities",
                    json!({
                        "buildings_list": [building_id],
                        "opportunity_types": ["LED", "HVAC", "Solar"],
                        "min_roi_threshold": 1.2,
                        "max_payback_years": 7,
                    }),
                ),
            ],
        )
    }

    fn portfolio_performance_plan(&self, request_lower: &str, intent: &IntentMatch) -> WorkflowPlan {
        let detection = detect_portfolio(request_lower);
        let full_year = date_range("current_year");

        WorkflowPlan::new(
            "portfolio_performance_workflow",
            PlanningMethod::RuleBased,
            format!(
                "portfolio performance query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. company detected: '{}' -> portfolio id: '{}'. routing to portfolio-intelligence agent for comprehensive performance analysis including energy usage, benchmarking, and sustainability reporting.",
                intent.intent, intent.confidence, intent.all_matches, detection.detected_via, detection.portfolio_id
            ),
            vec![
                step(
                    0,
                    "portfolio-intelligence",
                    "analyze_portfolio_energy_usage",
                    json!({
                        "portfolio_id": detection.portfolio_id,
                        "date_range": { "start_date": full_year.start_date, "end_date": full_year.end_date },
                    }),
                ),
                step(
                    1,
                    "portfolio-intelligence",
                    "benchmark_portfolio_performance",
                    json!({ "portfolio_id": detection.portfolio_id, "benchmark_type": "industry" }),
                ),
                step(
                    2,
                    "portfolio-intelligence",
                    "generate_sustainability_report",
                    json!({
                        "portfolio_id": detection.portfolio_id,
                        "reporting_period": { "start_date": full_year.start_date, "end_date": full_year.end_date },
                        "report_type": "executive",
                    }),
                ),
            ],
        )
    }

    fn portfolio_plan(&self, request_lower: &str, intent: &IntentMatch) -> WorkflowPlan {
        let detection = detect_portfolio(request_lower);
        let period = detect_time_period(request_lower);
        let range = date_range(period);

        WorkflowPlan::new(
            "portfolio_analysis_workflow",
            PlanningMethod::RuleBased,
            format!(
                "portfolio analysis query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. company detection: '{}' -> portfolio id: '{}'. time period detected: '{}' ({} to {}). routing to portfolio-intelligence agent for energy usage analysis and benchmarking.",
                intent.intent, intent.confidence, intent.all_matches, detection.detected_via, detection.portfolio_id, period, range.start_date, range.end_date
            ),
            vec![
                step(
                    0,
                    "portfolio-intelligence",
                    "analyze_portfolio_energy_usage",
                    json!({
                        "portfolio_id": detection.portfolio_id,
                        "date_range": { "start_date": range.start_date, "end_date": range.end_date },
                    }),
                ),
                step(
                    1,
                    "portfolio-intelligence",
                    "benchmark_portfolio_performance",
                    json!({ "portfolio_id": detection.portfolio_id, "benchmark_type": "industry_comparison" }),
                ),
            ],
        )
    }

    fn finance_plan(&self, request_lower: &str, intent: &IntentMatch) -> WorkflowPlan {
        let building_id = detect_building_id(request_lower);
        let (project_type, matched_keyword) = detect_project_type(request_lower);
        let investment_amount = detect_investment_amount(request_lower);

        WorkflowPlan::new(
            "financial_analysis_workflow",
            PlanningMethod::RuleBased,
            format!(
                "financial/ROI query detected via keyword matcher. intent: '{}', confidence: {:.2}. all matches: {:?}. project type detected: '{}'. building id extracted: '{}'. investment amount extracted: ${:.0}. routing to energy-finance agent for ROI calculation and EaaS contract optimization.",
                intent.intent, intent.confidence, intent.all_matches,
                matched_keyword.unwrap_or("default LED"), building_id, investment_amount
            ),
            vec![
                step(
                    0,
                    "energy-finance",
                    "calculate_project_roi",
                    json!({
                        "project_details": {
                            "project_name": format!("{project_type} Retrofit for {building_id}"),
                            "technology_type": project_type,
                            "total_investment": investment_amount,
                            "installation_cost": investment_amount * 0.2,
                            "equipment_cost": investment_amount * 0.8,
                            "project_lifetime": 15,
                        },
                        "energy_savings": {
                            "annual_kwh_savings": investment_amount * 0.1,
                            "annual_gas_savings": 1000,
                            "demand_reduction_kw": 50,
                            "baseline_energy_cost": 75000,
                        },
                        "financial_parameters": {
                            "discount_rate": 0.08,
                            "electricity_rate": 0.12,
                            "gas_rate": 0.85,
                            "inflation_rate": 0.025,
                        },
                    }),
                ),
                step(
                    1,
                    "energy-finance",
                    "optimize_eaas_contract",
                    json!({
                        "contract_parameters": {
                            "contract_term": 10,
                            "guaranteed_savings": investment_amount * 0.15,
                            "base_year_consumption": 100000,
                            "sharing_percentage": 0.7,
                            "performance_threshold": 0.9,
                        },
                        "project_costs": {
                            "capital_cost": investment_amount,
                            "operating_costs": investment_amount * 0.1,
                            "maintenance_costs": investment_amount * 0.06,
                        },
                        "optimization_objectives": ["maximize_npv", "minimize_risk"],
                    }),
                ),
            ],
        )
    }

    fn document_plan(&self) -> WorkflowPlan {
        WorkflowPlan::new(
            "document_processing_workflow",
            PlanningMethod::RuleBased,
            "document/report cues detected in request text. routing to document-processing for extraction, then summarize for a condensed result.".to_string(),
            vec![
                step(
                    0,
                    "document-processing",
                    "extract_text",
                    json!({ "document_type": "utility_bill", "extraction_mode": "full_text" }),
                ),
                step(
                    1,
                    "summarize",
                    "summarize_text",
                    json!({ "summary_length": "medium", "focus_areas": ["key_insights", "recommendations"] }),
                ),
            ],
        )
    }

    fn general_plan(&self) -> WorkflowPlan {
        WorkflowPlan::new(
            "general_analysis_workflow",
            PlanningMethod::RuleBased,
            "no specific intent matched a routing rule; defaulting to a general facility search.".to_string(),
            vec![step(
                0,
                "portfolio-intelligence",
                "search_facilities",
                json!({ "location": "all", "facility_type": null, "min_capacity": null, "max_capacity": null }),
            )],
        )
    }
}

#[async_trait]
impl Planner for RulePlanner {
    async fn create_workflow(
        &self,
        request: &str,
        intent: &IntentMatch,
        available_agents: &[String],
    ) -> ConductorResult<WorkflowPlan> {
        if available_agents.is_empty() {
            return Ok(WorkflowPlan::no_agents());
        }

        let request_lower = request.to_lowercase();

        let plan = match intent.intent.as_str() {
            "out_of_scope" => self.out_of_scope_plan(intent),
            "energy_monitoring"
                if ["date", "time", "when", "latest", "recent", "most recent"]
                    .iter()
                    .any(|cue| request_lower.contains(cue)) =>
            {
                self.energy_monitoring_date_plan(intent)
            }
            "time" => self.time_plan(intent),
            "energy" => self.energy_plan(&request_lower, intent),
            "portfolio"
                if ["performance", "metrics", "benchmark", "sustainability"]
                    .iter()
                    .any(|cue| request_lower.contains(cue)) =>
            {
                self.portfolio_performance_plan(&request_lower, intent)
            }
            "portfolio" => self.portfolio_plan(&request_lower, intent),
            "finance" => self.finance_plan(&request_lower, intent),
            _ if ["document", "pdf", "report", "summarize"]
                .iter()
                .any(|cue| request_lower.contains(cue)) =>
            {
                self.document_plan()
            }
            _ => self.general_plan(),
        };

        Ok(plan)
    }
}
