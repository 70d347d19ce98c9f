//! Layered runtime configuration, following the same aggregation pattern
//! the platform's own settings module uses: one root that bundles
//! per-concern sections, each loadable from the environment with
//! documented defaults.

use serde::{Deserialize, Serialize};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

/// Planner-facing configuration: which planning method runs by default and
/// whether a model backend is configured. Absence of `model_api_key` is not
/// an error here — it is surfaced later as a planner-time fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_planning_method")]
    pub default_planning_method: String,
    #[serde(default)]
    pub model_provider: Option<String>,
    #[serde(default)]
    pub model_api_key: Option<String>,
}

fn default_planning_method() -> String {
    "auto".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_planning_method: default_planning_method(),
            model_provider: None,
            model_api_key: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self {
            default_planning_method: std::env::var("DEFAULT_PLANNING_METHOD")
                .unwrap_or_else(|_| default_planning_method()),
            model_provider: std::env::var("PREFERRED_MODEL_PROVIDER").ok(),
            model_api_key: std::env::var("MODEL_API_KEY").ok(),
        }
    }

    pub fn has_model_credentials(&self) -> bool {
        self.model_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Execution engine configuration: concurrency cap, per-step deadline, and
/// the feature toggles §6.3 enumerates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_concurrent_workflows")]
    pub max_concurrent_workflows: usize,
    #[serde(default = "default_step_timeout_seconds")]
    pub default_step_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub enable_intelligent_routing: bool,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

fn default_max_concurrent_workflows() -> usize {
    conductor_core::DEFAULT_MAX_CONCURRENT_WORKFLOWS
}

fn default_step_timeout_seconds() -> u64 {
    conductor_core::DEFAULT_STEP_TIMEOUT_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_workflows: default_max_concurrent_workflows(),
            default_step_timeout_seconds: default_step_timeout_seconds(),
            enable_intelligent_routing: true,
            cache_enabled: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            max_concurrent_workflows: env_or(
                "MAX_CONCURRENT_WORKFLOWS",
                default_max_concurrent_workflows(),
            ),
            default_step_timeout_seconds: env_or(
                "DEFAULT_STEP_TIMEOUT_SECONDS",
                default_step_timeout_seconds(),
            ),
            enable_intelligent_routing: env_bool("ENABLE_INTELLIGENT_ROUTING", true),
            cache_enabled: env_bool("CACHE_ENABLED", true),
        }
    }
}

/// Root configuration, aggregating the sections above the way the
/// platform's own settings root aggregates its database/agent/orchestration
/// sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self {
            planner: PlannerConfig::from_env(),
            engine: EngineConfig::from_env(),
        }
    }
}
