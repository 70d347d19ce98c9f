//! The Agent Registry: where agents become known to the runtime before any
//! workflow can reference them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::Agent;
use crate::error::{ConductorError, ConductorResult};

/// Constructs a live, `Uninitialized` agent instance. Kept separate from
/// `Agent::init` so registration (cheap, synchronous) can happen well before
/// the engine decides to actually stand an agent up (which may dial out to a
/// dependency and is async). A factory that itself cannot produce an
/// instance — bad config, say — fails with `ConfigError`; everything else an
/// agent needs a live connection for happens in `init`.
pub type AgentFactory = Arc<dyn Fn() -> ConductorResult<Arc<dyn Agent>> + Send + Sync>;

/// What the registry knows about one registered agent: its name, how to
/// build it, and the domain tags the Request Processor's routing consults.
#[derive(Clone)]
pub struct AgentDescriptor {
    pub name: String,
    pub factory: AgentFactory,
    pub domain_tags: Vec<String>,
}

impl std::fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("name", &self.name)
            .field("domain_tags", &self.domain_tags)
            .finish_non_exhaustive()
    }
}

impl AgentDescriptor {
    pub fn new(
        name: impl Into<String>,
        factory: AgentFactory,
        domain_tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            factory,
            domain_tags,
        }
    }
}

/// The set of agents known to the runtime, keyed by name. Registration is a
/// one-time setup step (typically all done before `InitializeAgents` runs);
/// lookups happen on every workflow plan and execution.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, AgentDescriptor>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register an agent under `name`. Re-registering the same name with the
    /// same factory (the same `Arc`, not merely an equivalent closure) is a
    /// no-op; re-registering it with a different factory is a name collision
    /// and returns `DuplicateAgent`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: AgentFactory,
        domain_tags: Vec<String>,
    ) -> ConductorResult<()> {
        let name = name.into();
        if let Some(existing) = self.agents.get(&name) {
            if Arc::ptr_eq(&existing.factory, &factory) {
                return Ok(());
            }
            return Err(ConductorError::duplicate_agent(name));
        }
        self.agents
            .insert(name.clone(), AgentDescriptor::new(name, factory, domain_tags));
        Ok(())
    }

    /// Names of every registered agent, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    /// Look up a registered agent's descriptor by name.
    pub fn get(&self, name: &str) -> ConductorResult<&AgentDescriptor> {
        self.agents
            .get(name)
            .ok_or_else(|| ConductorError::unknown_agent(name))
    }

    /// Names of agents carrying the given domain tag.
    pub fn by_domain(&self, tag: &str) -> Vec<String> {
        self.agents
            .values()
            .filter(|d| d.domain_tags.iter().any(|t| t == tag))
            .map(|d| d.name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use crate::tool::ToolDescriptor;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;

    struct StubAgent {
        name: String,
        tools: StdHashMap<String, ToolDescriptor>,
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            &self.name
        }
        fn state(&self) -> AgentState {
            AgentState::Ready
        }
        async fn init(&self) -> ConductorResult<()> {
            Ok(())
        }
        fn tools(&self) -> &StdHashMap<String, ToolDescriptor> {
            &self.tools
        }
        async fn close(&self) -> ConductorResult<()> {
            Ok(())
        }
    }

    fn stub_factory(name: &'static str) -> AgentFactory {
        Arc::new(move || {
            Ok(Arc::new(StubAgent {
                name: name.to_string(),
                tools: StdHashMap::new(),
            }) as Arc<dyn Agent>)
        })
    }

    #[test]
    fn register_then_get_round_trips() {
        let mut registry = AgentRegistry::new();
        let factory = stub_factory("system");
        registry
            .register("system", factory, vec!["time".into()])
            .unwrap();

        let descriptor = registry.get("system").unwrap();
        assert_eq!(descriptor.name, "system");
        let agent = (descriptor.factory)().unwrap();
        assert_eq!(agent.name(), "system");
    }

    #[test]
    fn get_unknown_agent_errors() {
        let registry = AgentRegistry::new();
        let err = registry.get("ghost").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnknownAgent);
    }

    #[test]
    fn reregistering_same_factory_is_idempotent() {
        let mut registry = AgentRegistry::new();
        let factory = stub_factory("energy-monitoring");
        registry
            .register("energy-monitoring", factory.clone(), vec!["energy".into()])
            .unwrap();
        registry
            .register("energy-monitoring", factory, vec!["energy".into()])
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_distinct_factory_is_a_collision() {
        let mut registry = AgentRegistry::new();
        registry
            .register("system", stub_factory("system"), vec![])
            .unwrap();
        let err = registry
            .register("system", stub_factory("system"), vec![])
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DuplicateAgent);
    }

    #[test]
    fn by_domain_filters_tagged_agents() {
        let mut registry = AgentRegistry::new();
        registry
            .register("energy-monitoring", stub_factory("energy-monitoring"), vec!["energy".into()])
            .unwrap();
        registry
            .register("energy-finance", stub_factory("energy-finance"), vec!["finance".into(), "energy".into()])
            .unwrap();
        registry
            .register("system", stub_factory("system"), vec!["time".into()])
            .unwrap();

        let mut energy_agents = registry.by_domain("energy");
        energy_agents.sort();
        assert_eq!(energy_agents, vec!["energy-finance".to_string(), "energy-monitoring".to_string()]);
    }
}
