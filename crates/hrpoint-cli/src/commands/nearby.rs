//! Nearby command implementation

use crate::cli::NearbyArgs;
use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::Result;
use hrpoint_core::models::{NearbyPoint, NearbyQuery};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct NearbyRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Radius (m)")]
    radius: i64,
    #[tabled(rename = "Risk")]
    risk: i64,
    #[tabled(rename = "Added")]
    time: String,
    #[tabled(rename = "Distance (km)")]
    distance: String,
}

impl From<NearbyPoint> for NearbyRow {
    fn from(point: NearbyPoint) -> Self {
        Self {
            location: format!("{}, {}", point.locpoint[0], point.locpoint[1]),
            title: point.title,
            radius: point.radius,
            risk: point.risk,
            time: point.time,
            distance: point.distance.unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn execute(args: NearbyArgs, workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    let mut query = NearbyQuery::new(args.grv, args.delta);
    if let Some(loc) = args.loc {
        query = query.with_locpoint(loc);
    }

    let results = workspace.query_engine().get_near_points(&query).await?;

    if output.is_json() {
        output.result(results)?;
    } else {
        output.section(format!("{} risk points nearby", results.len()));
        output.table(results.into_iter().map(NearbyRow::from).collect())?;
    }

    Ok(())
}
