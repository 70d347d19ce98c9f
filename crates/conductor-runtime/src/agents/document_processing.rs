//! The document-processing agent: text extraction from documents.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use conductor_core::{
    Agent, AgentState, ConductorResult, InputSchema, ParamSpec, ParamType, SyncTool, ToolDescriptor,
    ToolOutput, ToolParams,
};
use serde_json::json;

fn extract_text_tool() -> ToolDescriptor {
    let schema = InputSchema::new(vec![
        ParamSpec::new("document_reference", ParamType::String),
        ParamSpec::new("document_type", ParamType::String),
        ParamSpec::new("extraction_mode", ParamType::String),
    ]);

    let handler = SyncTool::new(|params: ToolParams| {
        let document_reference = params
            .get("document_reference")
            .and_then(|v| v.as_str())
            .unwrap_or("unspecified")
            .to_string();

        let mut fields = serde_json::Map::new();
        fields.insert("document_reference".into(), json!(document_reference));
        fields.insert(
            "extracted_text".into(),
            json!("Extracted document content placeholder."),
        );
        fields.insert("page_count".into(), json!(1));
        Ok(ToolOutput::direct(fields))
    });

    ToolDescriptor::new(
        "extract_text",
        "Extract text content from a referenced document",
        schema,
        Arc::new(handler),
    )
}

pub struct DocumentProcessingAgent {
    tools: HashMap<String, ToolDescriptor>,
}

impl DocumentProcessingAgent {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        tools.insert("extract_text".to_string(), extract_text_tool());
        Self { tools }
    }
}

impl Default for DocumentProcessingAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for DocumentProcessingAgent {
    fn name(&self) -> &str {
        "document-processing"
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
