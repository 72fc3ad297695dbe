use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// What produced an artifact: enough to rerun it bit-for-bit.
#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub code_rev: String,
    pub crate_version: &'static str,
    pub command: &'static str,
    pub params: Value,
    pub outputs: Vec<String>,
}

impl RunRecord {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            code_rev: code_rev(),
            crate_version: die_balance::VERSION,
            command,
            params,
            outputs: Vec::new(),
        }
    }
}

/// Write `<stem>.provenance.json` next to `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut record: RunRecord) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    record.outputs.push(artifact.to_string_lossy().into_owned());
    let path = sidecar_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
