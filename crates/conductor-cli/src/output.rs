//! Rendering helpers shared by the command modules: `json` mirrors a
//! value's `Serialize` impl verbatim, `text` formats a short human summary.

use colored::Colorize;
use comfy_table::{Cell, Table};
use conductor_runtime::{AgentSummary, RequestResponse, WorkflowResult, WorkflowStatus};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_cell(status: WorkflowStatus) -> Cell {
    let text = match status {
        WorkflowStatus::Completed => "completed".green().to_string(),
        WorkflowStatus::Failed => "failed".red().to_string(),
        WorkflowStatus::Cancelled => "cancelled".yellow().to_string(),
        WorkflowStatus::Running => "running".cyan().to_string(),
    };
    Cell::new(text)
}

pub fn print_response_text(response: &RequestResponse) {
    println!("{}  {}", "intent:".bold(), response.intent);
    println!("{}  {:.2}", "confidence:".bold(), response.confidence);
    println!("{}  {}", "planning method:".bold(), response.planning_method);
    println!("{}  {}", "reason:".bold(), response.planning_reason);
    println!();

    let mut table = Table::new();
    table.set_header(vec!["workflow", "status", "steps"]);
    table.add_row(vec![
        Cell::new(&response.workflow_id),
        status_cell(response.status),
        Cell::new(format!("{}/{}", response.steps_completed, response.steps_total)),
    ]);
    println!("{table}");

    if let Some(err) = &response.error {
        println!("{} {}", "error:".red().bold(), err);
    }
    println!("\n{}", response.summary);
}

pub fn print_workflow_status_text(workflow_id: &str, result: Option<&WorkflowResult>) {
    match result {
        None => println!("{} {workflow_id} not found", "status:".bold()),
        Some(result) => {
            let mut table = Table::new();
            table.set_header(vec!["workflow", "status", "steps", "started_at"]);
            table.add_row(vec![
                Cell::new(&result.workflow_id),
                status_cell(result.status),
                Cell::new(format!("{}/{}", result.steps_completed, result.total_steps)),
                Cell::new(result.started_at.to_rfc3339()),
            ]);
            println!("{table}");
        }
    }
}

pub fn print_agents_text(agents: &[AgentSummary]) {
    let mut table = Table::new();
    table.set_header(vec!["agent", "state", "tools"]);
    for agent in agents {
        let tool_names: Vec<&str> = agent.tools.iter().map(|t| t.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(&agent.name),
            Cell::new(agent.state.to_string()),
            Cell::new(tool_names.join(", ")),
        ]);
    }
    println!("{table}");
}
