//! Near command implementation

use crate::cli::NearArgs;
use crate::output::OutputWriter;
use crate::workspace::Workspace;
use anyhow::Result;

pub async fn execute(args: NearArgs, workspace: &Workspace, output: &OutputWriter) -> Result<()> {
    let found = workspace.store().get_near_point(args.at).await?;

    if output.is_json() {
        output.result(found.map(|m| m.point))?;
        return Ok(());
    }

    match found {
        Some(m) => {
            output.success(format!("Inside risk zone \"{}\"", m.point.title));
            output.kv("Center", format!("{}, {}", m.point.location.lon(), m.point.location.lat()));
            output.kv("Radius", format!("{} m", m.point.radius));
            output.kv("Risk", m.point.risk);
            output.kv("Distance", format!("{:.0} m", m.distance_m));
        }
        None => output.info(format!("No risk zone contains {}, {}", args.at[0], args.at[1])),
    }

    Ok(())
}
