mod cli;
mod commands;
mod output;
mod session;

use clap::Parser;

use cli::{AgentsCommands, Cli, Commands, WorkflowCommands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let session = session::build_session().await?;

    match cli.command {
        Commands::Run { request } => commands::run::execute(&session, &request, &cli.output).await,
        Commands::Agents { command: AgentsCommands::List } => {
            commands::agents::list(&session, &cli.output)
        }
        Commands::Workflow { command: WorkflowCommands::Status { workflow_id } } => {
            commands::workflow::status(&session, &workflow_id, &cli.output)
        }
    }
}
