//! Add command implementation

use crate::cli::AddArgs;
use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use hrpoint_core::models::BatchInsertRequest;
use hrpoint_store::{Session, SpatialEngine};
use serde::Serialize;

#[derive(Serialize)]
struct AddOutput {
    inserted: usize,
    replaced: bool,
}

pub async fn execute(args: AddArgs, workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let request = BatchInsertRequest::from_json(&content)
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;

    let store = workspace.store();
    let ids = if args.replace {
        // Truncate and insert together, or not at all
        let session = store.engine().start_session().await?;
        match store.add_batch(&request.points, false, Some(&session)).await {
            Ok(ids) => {
                session.commit().await?;
                ids
            }
            Err(e) => {
                session.abort().await?;
                return Err(e.into());
            }
        }
    } else {
        store.add_batch(&request.points, true, None).await?
    };

    workspace.save().await?;

    if output.is_json() {
        output.result(AddOutput { inserted: ids.len(), replaced: args.replace })?;
    } else if args.replace {
        output.success(format!("Replaced stored points with {} risk points", ids.len()));
    } else {
        output.success(format!("Added {} risk points", ids.len()));
    }

    Ok(())
}
