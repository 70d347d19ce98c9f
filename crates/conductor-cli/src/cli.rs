use clap::{Parser, Subcommand};

/// Thin terminal front end for the conductor orchestration runtime.
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format (text, json)
    #[arg(long, short = 'o', global = true, default_value = "text")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a natural-language request through the request processor
    Run {
        /// The request text
        request: String,
    },

    /// Agent-related subcommands
    Agents {
        #[command(subcommand)]
        command: AgentsCommands,
    },

    /// Workflow-related subcommands
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentsCommands {
    /// List every initialized agent and its tool catalogue
    List,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// Show the status of a previously run workflow
    Status {
        /// Workflow id returned by `conductor run`
        workflow_id: String,
    },
}
