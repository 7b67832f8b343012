//! Init command implementation

use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::Result;
use hrpoint_store::RISK_POINT_COLLECTION;
use serde::Serialize;

#[derive(Serialize)]
struct InitOutput {
    data_file: String,
    collection: &'static str,
    collection_created: bool,
    index_created: bool,
    schema_updated: bool,
}

pub async fn execute(workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    workspace.save().await?;
    let report = workspace.init_report;

    if output.is_json() {
        output.result(InitOutput {
            data_file: workspace.data_file().display().to_string(),
            collection: RISK_POINT_COLLECTION,
            collection_created: report.collection_created,
            index_created: report.index_created,
            schema_updated: report.schema_updated,
        })?;
    } else if report.collection_created || report.index_created || report.schema_updated {
        output.success(format!(
            "Initialized collection {} in {}",
            RISK_POINT_COLLECTION,
            workspace.data_file().display()
        ));
    } else {
        output.info(format!(
            "Collection {} already initialized in {}",
            RISK_POINT_COLLECTION,
            workspace.data_file().display()
        ));
    }

    Ok(())
}
