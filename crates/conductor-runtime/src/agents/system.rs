//! The system agent: dependency-free, always `Ready`. Exposes scope
//! checking (used by the Rule Planner's out-of-scope routing) and the
//! current time.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;
use std::sync::Arc;

fn scope_check_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("scope", ParamType::String).required(),
        ParamSpec::new("system_domain", ParamType::String).required(),
        ParamSpec::new("supported_topics", ParamType::Array).required(),
        ParamSpec::new("unsupported_topics", ParamType::Array).required(),
        ParamSpec::new("recommendation", ParamType::String).required(),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let mut fields = params.clone();
        fields.insert(
            "analysis".to_string(),
            json!("This request is outside the scope of the Energy-as-a-Service platform."),
        );
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "scope_check",
        "Check whether a request is within system scope",
        schema,
        Arc::new(handler),
    )
}

fn get_current_time_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![ParamSpec::new("timezone", ParamType::String)
        .with_description("IANA timezone name; reported as-is alongside a UTC timestamp")]);

    let handler = SyncTool::new(|params: ToolParams| {
        let timezone = params
            .get("timezone")
            .and_then(|v| v.as_str())
            .unwrap_or("America/Denver")
            .to_string();
        let now = Utc::now();

        let mut fields = serde_json::Map::new();
        fields.insert("current_date".into(), json!(now.format("%Y-%m-%d").to_string()));
        fields.insert("current_time".into(), json!(now.format("%H:%M:%S").to_string()));
        fields.insert("timezone".into(), json!(timezone));
        fields.insert("full_datetime".into(), json!(now.to_rfc3339()));
        fields.insert("day_of_week".into(), json!(now.format("%A").to_string()));
        fields.insert(
            "analysis".into(),
            json!(format!(
                "Current date: {} at {} UTC",
                now.format("%A, %B %d, %Y"),
                now.format("%I:%M %p")
            )),
        );
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "get_current_time",
        "Get the current date and time",
        schema,
        Arc::new(handler),
    )
}

pub struct SystemAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl SystemAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("scope_check".to_string(), scope_check_tool());
        tools.insert("get_current_time".to_string(), get_current_time_tool());
        Self { tools }
    }
}

impl Default for SystemAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for SystemAgent {
    fn name(&self) -> &str {
        "system"
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
    async fn get_current_time_reports_requested_timezone() {
        let agent = SystemAgent::new();
        let mut params = ToolParams::new();
        params.insert("timezone".into(), json!("America/Denver"));
        let output = agent.invoke("get_current_time", params).await.unwrap();
        assert_eq!(output.get_field("timezone"), Some(json!("America/Denver")));
        assert!(output.get_field("current_date").is_some());
    }

    #[tokio::test]
    async fn scope_check_echoes_inputs_and_adds_analysis() {
        let agent = SystemAgent::new();
        let mut params = ToolParams::new();
        params.insert("scope".into(), json!("out_of_bounds"));
        params.insert("system_domain".into(), json!("EaaS"));
        params.insert("supported_topics".into(), json!(["energy"]));
        params.insert("unsupported_topics".into(), json!(["weather"]));
        params.insert("recommendation".into(), json!("ask about energy"));
        let output = agent.invoke("scope_check", params).await.unwrap();
        assert_eq!(output.get_field("scope"), Some(json!("out_of_bounds")));
        assert!(output.get_field("analysis").is_some());
    }

    #[tokio::test]
    async fn unknown_tool_errors() {
        let agent = SystemAgent::new();
        let err = agent.invoke("not_a_tool", ToolParams::new()).await.unwrap_err();
        assert_eq!(err.kind, conductor_core::ErrorKind::UnknownTool);
    }
}
