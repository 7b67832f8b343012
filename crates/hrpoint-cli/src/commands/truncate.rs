//! Truncate command implementation

use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::Result;

pub async fn execute(workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    let removed = workspace.store().truncate(None).await?;
    workspace.save().await?;

    if output.is_json() {
        output.result(serde_json::json!({ "removed": removed }))?;
    } else {
        output.success(format!("Removed {} risk points", removed));
    }

    Ok(())
}
