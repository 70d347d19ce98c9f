//! The portfolio-intelligence agent: usage analysis, benchmarking,
//! sustainability reporting, optimization discovery, and facility search
//! across a portfolio.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;

fn analyze_portfolio_energy_usage_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("portfolio_id", ParamType::String).required(),
        ParamSpec::new("date_range", ParamType::Object).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let portfolio_id = params.get("portfolio_id").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
        let mut fields = serde_json::Map::new();
        fields.insert("portfolio_id".into(), json!(portfolio_id));
        fields.insert("total_kwh".into(), json!(1_284_300.0));
        fields.insert("building_count".into(), json!(14));
        fields.insert("usage_kwh".into(), json!(1_284_300.0));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "analyze_portfolio_energy_usage",
        "Analyze energy usage across a portfolio",
        schema,
        Arc::new(handler),
    )
}

fn benchmark_portfolio_performance_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("portfolio_id", ParamType::String).required(),
        ParamSpec::new("benchmark_type", ParamType::String).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let portfolio_id = params.get("portfolio_id").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
        let mut fields = serde_json::Map::new();
        fields.insert("portfolio_id".into(), json!(portfolio_id));
        fields.insert("percentile_rank".into(), json!(72));
        fields.insert("eui_vs_benchmark_pct".into(), json!(-8.5));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "benchmark_portfolio_performance",
        "Benchmark a portfolio against industry performance",
        schema,
        Arc::new(handler),
    )
}

fn generate_sustainability_report_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("portfolio_id", ParamType::String).required(),
        ParamSpec::new("reporting_period", ParamType::Object).required(),
        ParamSpec::new("report_type", ParamType::String).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let portfolio_id = params.get("portfolio_id").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
        let mut fields = serde_json::Map::new();
        fields.insert("portfolio_id".into(), json!(portfolio_id));
        fields.insert("co2e_tons_avoided".into(), json!(412.0));
        fields.insert("report_url".into(), json!(format!("reports/{portfolio_id}/sustainability.pdf")));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "generate_sustainability_report",
        "Generate a sustainability report for a portfolio",
        schema,
        Arc::new(handler),
    )
}

fn identify_optimization_opportunities_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("buildings_list", ParamType::Array).required(),
        ParamSpec::new("opportunity_types", ParamType::Array).required(),
        ParamSpec::new("min_roi_threshold", ParamType::Number).required(),
        ParamSpec::new("max_payback_years", ParamType::Number).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let buildings = params.get("buildings_list").cloned().unwrap_or(json!([]));
        let mut fields = serde_json::Map::new();
        fields.insert("buildings_evaluated".into(), buildings);
        fields.insert(
            "opportunities".into(),
            json!([
                {"type": "LED", "estimated_roi": 2.4, "payback_years": 3.1},
                {"type": "HVAC", "estimated_roi": 1.8, "payback_years": 5.2},
            ]),
        );
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "identify_optimization_opportunities",
        "Find energy optimization opportunities across a portfolio",
        schema,
        Arc::new(handler),
    )
}

fn search_facilities_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("location", ParamType::String),
        ParamSpec::new("facility_type", ParamType::String),
        ParamSpec::new("min_capacity", ParamType::Number),
        ParamSpec::new("max_capacity", ParamType::Number),
    ]);

    let handler = SyncTool::new(|_params: ToolParams| {
        let mut fields = serde_json::Map::new();
        fields.insert(
            "facilities".into(),
            json!([
                {"facility_id": "FAC-1001", "name": "Denver Distribution Center"},
                {"facility_id": "FAC-1002", "name": "Austin Fulfillment Hub"},
            ]),
        );
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "search_facilities",
        "Search for facilities matching criteria",
        schema,
        Arc::new(handler),
    )
}

pub struct PortfolioIntelligenceAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl PortfolioIntelligenceAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("analyze_portfolio_energy_usage".to_string(), analyze_portfolio_energy_usage_tool());
        tools.insert("benchmark_portfolio_performance".to_string(), benchmark_portfolio_performance_tool());
        tools.insert("generate_sustainability_report".to_string(), generate_sustainability_report_tool());
        tools.insert("identify_optimization_opportunities".to_string(), identify_optimization_opportunities_tool());
        tools.insert("search_facilities".to_string(), search_facilities_tool());
        Self { tools }
    }
}

impl Default for PortfolioIntelligenceAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for PortfolioIntelligenceAgent {
    fn name(&self) -> &str {
        "portfolio-intelligence"
    }

    fn state(&self) -> AgentState {
        AgentState::Ready
    }

    async fn init(&self) -> ConductorResult<()> {
        Ok(())
    }

    fn tools(&self) -> &HashMap<String, ToolDescriptor> {
        &self.tools
    }

    async fn close(&self) -> ConductorResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn analyze_portfolio_echoes_portfolio_id() {
        let agent = PortfolioIntelligenceAgent::new();
        let mut params = ToolParams::new();
        params.insert("portfolio_id".into(), json!("PORTFOLIO-002"));
        params.insert("date_range".into(), json!({"start_date": "2025-01-01", "end_date": "2025-12-31"}));
        let output = agent.invoke("analyze_portfolio_energy_usage", params).await.unwrap();
        assert_eq!(output.get_field("portfolio_id"), Some(json!("PORTFOLIO-002")));
    }

    #[tokio::test]
    async fn search_facilities_ignores_missing_filters() {
        let agent = PortfolioIntelligenceAgent::new();
        let mut params = ToolParams::new();
        params.insert("location".into(), json!("all"));
        let output = agent.invoke("search_facilities", params).await.unwrap();
        assert!(output.get_field("facilities").is_some());
    }
}
