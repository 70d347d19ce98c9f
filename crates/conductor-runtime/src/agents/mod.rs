//! Illustrative domain agents registered with a fresh [`AgentRegistry`].
//!
//! These are reference implementations of the agent contract, not the
//! product's business logic — each tool returns a plausible derived
//! payload rather than querying a real backend.

pub mod document_processing;
pub mod energy_finance;
pub mod energy_monitoring;
pub mod portfolio_intelligence;
pub mod summarize;
pub mod system;

pub use document_processing::DocumentProcessingAgent;
pub use energy_finance::EnergyFinanceAgent;
pub use energy_monitoring::EnergyMonitoringAgent;
pub use portfolio_intelligence::PortfolioIntelligenceAgent;
pub use summarize::SummarizeAgent;
pub use system::SystemAgent;

use std::sync::Arc;

use conductor_core::{Agent, AgentRegistry, ConductorResult};

/// Registers all six illustrative agents under their canonical domain tags.
/// Each factory constructs a fresh, dependency-free agent instance — these
/// agents never fail to construct, so the factories are infallible in
/// practice, but the registry's contract still requires the `Result`.
pub fn register_default_agents(registry: &mut AgentRegistry) -> ConductorResult<()> {
    registry.register(
        "system",
        Arc::new(|| Ok(Arc::new(SystemAgent::new()) as Arc<dyn Agent>)),
        vec!["time".to_string(), "monitoring".to_string()],
    )?;
    registry.register(
        "energy-monitoring",
        Arc::new(|| Ok(Arc::new(EnergyMonitoringAgent::new()) as Arc<dyn Agent>)),
        vec!["energy".to_string(), "monitoring".to_string(), "energy_monitoring".to_string()],
    )?;
    registry.register(
        "portfolio-intelligence",
        Arc::new(|| Ok(Arc::new(PortfolioIntelligenceAgent::new()) as Arc<dyn Agent>)),
        vec!["portfolio".to_string(), "energy".to_string()],
    )?;
    registry.register(
        "energy-finance",
        Arc::new(|| Ok(Arc::new(EnergyFinanceAgent::new()) as Arc<dyn Agent>)),
        vec!["finance".to_string()],
    )?;
    registry.register(
        "document-processing",
        Arc::new(|| Ok(Arc::new(DocumentProcessingAgent::new()) as Arc<dyn Agent>)),
        vec!["document".to_string()],
    )?;
    registry.register(
        "summarize",
        Arc::new(|| Ok(Arc::new(SummarizeAgent::new()) as Arc<dyn Agent>)),
        vec!["document".to_string()],
    )?;
    Ok(())
}
