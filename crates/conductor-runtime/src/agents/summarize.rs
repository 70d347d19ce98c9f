//! The summarize agent: condenses prior step output into prose.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;

fn summarize_text_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("text", ParamType::String),
        ParamSpec::new("max_length", ParamType::Number),
        ParamSpec::new("summary_length", ParamType::String),
        ParamSpec::new("focus_areas", ParamType::Array),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let text = params.get("text").and_then(|v| v.as_str()).unwrap_or("").to_string();
        let max_length = params
            .get("max_length")
            .and_then(|v| v.as_u64())
            .unwrap_or(200) as usize;

        let summary: String = text.chars().take(max_length).collect();
        let mut fields = serde_json::Map::new();
        fields.insert("summary".into(), json!(summary));
        fields.insert("original_length".into(), json!(text.chars().count()));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "summarize_text",
        "Summarize a block of text to a target length",
        schema,
        Arc::new(handler),
    )
}

pub struct SummarizeAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl SummarizeAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("summarize_text".to_string(), summarize_text_tool());
        Self { tools }
    }
}

impl Default for SummarizeAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for SummarizeAgent {
    fn name(&self) -> &str {
        "summarize"
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
    async fn summarize_truncates_to_max_length() {
        let agent = SummarizeAgent::new();
        let mut params = ToolParams::new();
        params.insert("text".into(), json!("a".repeat(500)));
        params.insert("max_length".into(), json!(50));
        let output = agent.invoke("summarize_text", params).await.unwrap();
        let summary = output.get_field("summary").unwrap();
        assert_eq!(summary.as_str().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn summarize_defaults_max_length_to_200() {
        let agent = SummarizeAgent::new();
        let mut params = ToolParams::new();
        params.insert("text".into(), json!("short text"));
        let output = agent.invoke("summarize_text", params).await.unwrap();
        assert_eq!(output.get_field("summary"), Some(json!("short text")));
    }
}
