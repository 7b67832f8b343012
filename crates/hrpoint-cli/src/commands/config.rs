//! Config command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use hrpoint_core::config::{ConfigSource, LayeredConfig};
use std::collections::BTreeMap;

fn source_label(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "env",
        ConfigSource::Cli => "cli",
    }
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let entries: BTreeMap<_, _> = config.to_inspection_map().into_iter().collect();

    if output.is_json() {
        let data: BTreeMap<_, _> = entries
            .iter()
            .map(|(key, (value, source))| {
                (key, serde_json::json!({ "value": value, "source": source_label(*source) }))
            })
            .collect();
        output.result(data)?;
    } else {
        output.section("Configuration");
        for (key, (value, source)) in &entries {
            output.kv(key, format!("{} ({})", value, source_label(*source)));
        }
    }

    Ok(())
}
