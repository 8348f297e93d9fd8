pub mod config;
pub mod manifest;

use anyhow::Result;
use std::path::Path;

/// Translate a manifest of paired-end read files into the pipeline
/// configuration document.
///
/// Reads the manifest once, deriving one sample record per line, then
/// writes the assembled JSON document to `output` (overwriting it).
/// Returns the number of samples written. Any malformed manifest line
/// aborts the run before the output file is touched.
pub fn translate(manifest_path: &Path, output: &Path) -> Result<usize> {
    let records = manifest::read_manifest(manifest_path)?;
    config::write_config(output, &records)?;
    Ok(records.len())
}
