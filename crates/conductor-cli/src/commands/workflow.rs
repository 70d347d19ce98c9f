use anyhow::Result;

use crate::output;
use crate::session::Session;

/// Looks up a workflow in this process's own execution table. Since the CLI
/// starts a fresh engine per invocation, this will only ever find a
/// workflow started earlier in the *same* process — it exists to exercise
/// the Observable Surface, not as a durable status store.
pub fn status(session: &Session, workflow_id: &str, output_format: &str) -> Result<()> {
    let result = session.engine.get_workflow_status(workflow_id);

    match output_format {
        "json" => match &result {
            Some(r) => output::print_json(r)?,
            None => output::print_json(&serde_json::json!({ "status": "not_found" }))?,
        },
        _ => output::print_workflow_status_text(workflow_id, result.as_ref()),
    }
    Ok(())
}
