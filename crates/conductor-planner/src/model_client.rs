//! The external model provider boundary the Model Planner depends on.

use async_trait::async_trait;

/// Abstracts whatever backend (OpenAI, Anthropic, a local model) answers a
/// planning prompt with a JSON-encoded `WorkflowPlan`. The planner never
/// talks to a provider directly so it can be exercised against a
/// deterministic fake in tests and swapped at the runtime layer without
/// touching planning logic.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelClientError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelClientError {
    #[error("model credentials are not configured")]
    MissingCredentials,
    #[error("model request failed: {0}")]
    RequestFailed(String),
    #[error("model request timed out")]
    Timeout,
}

/// A `ModelClient` with no credentials configured, used as the default when
/// `RuntimeConfig`'s `model_api_key` is absent. Every call fails fast with
/// `MissingCredentials` so the Model/Hybrid/Adaptive planners take their
/// documented rule-based fallback path without attempting network I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredModelClient;

#[async_trait]
impl ModelClient for UnconfiguredModelClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelClientError> {
        Err(ModelClientError::MissingCredentials)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_always_fails_with_missing_credentials() {
        let err = UnconfiguredModelClient.generate("anything").await.unwrap_err();
        assert!(matches!(err, ModelClientError::MissingCredentials));
    }
}
