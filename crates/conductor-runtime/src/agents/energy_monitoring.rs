//! The energy-monitoring agent: latest readings, usage-pattern analysis,
//! and meter-data processing. Returns plausible derived payloads; none of
//! this is real telemetry analytics.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;

fn get_latest_energy_reading_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![ParamSpec::new("include_details", ParamType::Boolean)]);

    let handler = SyncTool::new(|params: ToolParams| {
        let include_details = params.get("include_details").and_then(|v| v.as_bool()).unwrap_or(false);
        let mut fields = serde_json::Map::new();
        fields.insert("reading_kwh".into(), json!(482.7));
        fields.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
        fields.insert("meter_id".into(), json!("meter-0042"));
        if include_details {
            fields.insert("voltage".into(), json!(240.1));
            fields.insert("power_factor".into(), json!(0.97));
        }
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "get_latest_energy_reading",
        "Get the most recent energy usage reading",
        schema,
        Arc::new(handler),
    )
}

fn analyze_usage_patterns_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("scope", ParamType::String).required(),
        ParamSpec::new("identifier", ParamType::String).required(),
        ParamSpec::new("time_range", ParamType::Object).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let identifier = params.get("identifier").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
        let mut fields = serde_json::Map::new();
        fields.insert("identifier".into(), json!(identifier));
        fields.insert("average_daily_kwh".into(), json!(1120.5));
        fields.insert("peak_hour".into(), json!("14:00"));
        fields.insert("trend".into(), json!("increasing"));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "analyze_usage_patterns",
        "Analyze energy consumption patterns for buildings",
        schema,
        Arc::new(handler),
    )
}

fn process_meter_data_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![ParamSpec::new("reading", ParamType::Object).required()]);

    let handler = SyncTool::new(|params: ToolParams| {
        let reading = params.get("reading").cloned().unwrap_or(json!({}));
        let mut fields = serde_json::Map::new();
        fields.insert("accepted_reading".into(), reading);
        fields.insert("anomaly_detected".into(), json!(false));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "process_meter_data",
        "Process real-time meter data with anomaly detection",
        schema,
        Arc::new(handler),
    )
}

pub struct EnergyMonitoringAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl EnergyMonitoringAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("get_latest_energy_reading".to_string(), get_latest_energy_reading_tool());
        tools.insert("analyze_usage_patterns".to_string(), analyze_usage_patterns_tool());
        tools.insert("process_meter_data".to_string(), process_meter_data_tool());
        Self { tools }
    }
}

impl Default for EnergyMonitoringAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for EnergyMonitoringAgent {
    fn name(&self) -> &str {
        "energy-monitoring"
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
    async fn latest_reading_includes_details_when_requested() {
        let agent = EnergyMonitoringAgent::new();
        let mut params = ToolParams::new();
        params.insert("include_details".into(), json!(true));
        let output = agent.invoke("get_latest_energy_reading", params).await.unwrap();
        assert!(output.get_field("voltage").is_some());
    }

    #[tokio::test]
    async fn usage_patterns_echo_identifier() {
        let agent = EnergyMonitoringAgent::new();
        let mut params = ToolParams::new();
        params.insert("scope".into(), json!("building"));
        params.insert("identifier".into(), json!("building_7"));
        params.insert("time_range".into(), json!({"start_date": "2025-01-01", "end_date": "2025-12-31"}));
        let output = agent.invoke("analyze_usage_patterns", params).await.unwrap();
        assert_eq!(output.get_field("identifier"), Some(json!("building_7")));
    }
}
