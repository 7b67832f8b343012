//! Export command implementation

use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use geojson::FeatureCollection;

pub async fn execute(args: ExportArgs, workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    let points = workspace.store().all_points().await?;
    let collection = FeatureCollection {
        bbox: None,
        features: points.iter().map(|p| p.to_feature()).collect(),
        foreign_members: None,
    };

    match args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&collection)?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(format!("Exported {} risk points to {}", points.len(), path.display()));
        }
        None => output.data(&collection)?,
    }

    Ok(())
}
