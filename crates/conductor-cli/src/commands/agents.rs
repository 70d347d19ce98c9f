use anyhow::Result;

use crate::output;
use crate::session::Session;

pub fn list(session: &Session, output_format: &str) -> Result<()> {
    let agents = session.engine.agent_summaries();

    match output_format {
        "json" => output::print_json(&agents)?,
        _ => output::print_agents_text(&agents),
    }
    Ok(())
}
