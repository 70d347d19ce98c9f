use anyhow::Result;

use crate::output;
use crate::session::Session;

pub async fn execute(session: &Session, request: &str, output_format: &str) -> Result<()> {
    let response = session.processor.process_request(request).await?;

    match output_format {
        "json" => output::print_json(&response)?,
        _ => output::print_response_text(&response),
    }
    Ok(())
}
