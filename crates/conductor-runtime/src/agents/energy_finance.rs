//! The energy-finance agent: ROI calculation and EaaS contract
//! optimization.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;

fn calculate_project_roi_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("project_details", ParamType::Object).required(),
        ParamSpec::new("energy_savings", ParamType::Object).required(),
        ParamSpec::new("financial_parameters", ParamType::Object).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let investment = params
            .get("project_details")
            .and_then(|v| v.get("total_investment"))
            .and_then(|v| v.as_f64())
            .unwrap_or(50_000.0);
        let annual_savings = investment * 0.22;
        let payback_years = investment / annual_savings;

        let mut fields = serde_json::Map::new();
        fields.insert("investment_amount".into(), json!(investment));
        fields.insert("annual_savings".into(), json!(annual_savings));
        fields.insert("payback_years".into(), json!(payback_years));
        fields.insert("roi_percent".into(), json!(22.0));
        fields.insert("ten_year_net_savings".into(), json!(annual_savings * 10.0 - investment));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "calculate_project_roi",
        "Calculate return on investment for an energy project",
        schema,
        Arc::new(handler),
    )
}

fn optimize_eaas_contract_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("contract_parameters", ParamType::Object).required(),
        ParamSpec::new("project_costs", ParamType::Object).required(),
        ParamSpec::new("optimization_objectives", ParamType::Array).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let capital_cost = params
            .get("project_costs")
            .and_then(|v| v.get("capital_cost"))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        let mut fields = serde_json::Map::new();
        fields.insert("recommended_term_years".into(), json!(7));
        fields.insert("projected_savings_rate".into(), json!(0.18));
        fields.insert("projected_npv".into(), json!(capital_cost * 0.35));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "optimize_eaas_contract",
        "Optimize an energy-as-a-service contract structure",
        schema,
        Arc::new(handler),
    )
}

pub struct EnergyFinanceAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl EnergyFinanceAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("calculate_project_roi".to_string(), calculate_project_roi_tool());
        tools.insert("optimize_eaas_contract".to_string(), optimize_eaas_contract_tool());
        Self { tools }
    }
}

impl Default for EnergyFinanceAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for EnergyFinanceAgent {
    fn name(&self) -> &str {
        "energy-finance"
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
    async fn calculate_project_roi_uses_investment_amount() {
        let agent = EnergyFinanceAgent::new();
        let mut params = ToolParams::new();
        params.insert("project_details".into(), json!({"project_type": "LED", "total_investment": 100000.0}));
        params.insert("energy_savings".into(), json!({"annual_kwh_saved": 10000}));
        params.insert("financial_parameters".into(), json!({"discount_rate": 0.08}));
        let output = agent.invoke("calculate_project_roi", params).await.unwrap();
        assert_eq!(output.get_field("investment_amount"), Some(json!(100000.0)));
        assert!(output.get_field("payback_years").is_some());
    }

    #[tokio::test]
    async fn calculate_project_roi_defaults_investment_amount() {
        let agent = EnergyFinanceAgent::new();
        let mut params = ToolParams::new();
        params.insert("project_details".into(), json!({"project_type": "LED"}));
        params.insert("energy_savings".into(), json!({}));
        params.insert("financial_parameters".into(), json!({}));
        let output = agent.invoke("calculate_project_roi", params).await.unwrap();
        assert_eq!(output.get_field("investment_amount"), Some(json!(50000.0)));
    }
}
