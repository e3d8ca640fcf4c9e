//! Writes the bundle as a JSON data file and as a script a static page can
//! include directly.

use crate::core::bundle::Bundle;
use crate::core::config::OutputConfig;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const SCRIPT_HEADER: &str = "// Auto-generato da euribor-update - NON modificare manualmente";

/// Pretty JSON with two-space indentation; non-ASCII text is kept as is.
pub fn render_json(bundle: &Bundle) -> Result<String> {
    serde_json::to_string_pretty(bundle).context("Failed to serialize bundle as JSON")
}

/// Single comment line followed by `const <variable> = <compact JSON>;`.
pub fn render_script(bundle: &Bundle, variable: &str) -> Result<String> {
    let payload = serde_json::to_string(bundle).context("Failed to serialize bundle as JSON")?;
    Ok(format!("{SCRIPT_HEADER}\nconst {variable} = {payload};\n"))
}

/// Extracts and parses the JSON payload from a file produced by [`render_script`].
pub fn parse_script_payload(script: &str, variable: &str) -> Result<Value> {
    let prefix = format!("const {variable} = ");
    let statement = script
        .lines()
        .find(|line| line.starts_with(&prefix))
        .ok_or_else(|| anyhow!("No assignment to {variable} found in script"))?;
    let payload = statement[prefix.len()..]
        .strip_suffix(';')
        .ok_or_else(|| anyhow!("Assignment to {variable} is not terminated with ';'"))?;
    serde_json::from_str(payload).context("Script payload is not valid JSON")
}

/// Renders both documents, then overwrites both files.
///
/// Nothing is written if either document fails to render.
pub fn write_outputs(bundle: &Bundle, output: &OutputConfig) -> Result<()> {
    let json = render_json(bundle)?;
    let script = render_script(bundle, &output.variable)?;

    write_file(&output.json_path, &json)?;
    write_file(&output.script_path, &script)?;
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote output file");
    Ok(())
}
