use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use planimeter::recorder::{ExperimentLog, COLUMNS};
use polars::prelude::*;
use serde::Serialize;

/// Run parameters echoed into the `<out>.meta.json` sidecar.
#[derive(Serialize)]
pub struct RunMeta {
    pub input: String,
    pub samples: usize,
    pub repeat: u64,
    pub seed: u64,
    pub batch: usize,
    pub width: f64,
    pub height: f64,
    pub version: &'static str,
}

/// Write the experiment log as CSV: one header row with the six contract
/// columns, one row per run, floats fixed to 4 decimal places.
pub fn write_csv(path: &Path, log: &ExperimentLog) -> Result<()> {
    let rows = log.all();
    let mut df = df!(
        COLUMNS[0] => rows.iter().map(|r| r.samples as i64).collect::<Vec<i64>>(),
        COLUMNS[1] => rows.iter().map(|r| r.time_ms()).collect::<Vec<f64>>(),
        COLUMNS[2] => rows.iter().map(|r| r.exact_area).collect::<Vec<f64>>(),
        COLUMNS[3] => rows.iter().map(|r| r.estimated_area).collect::<Vec<f64>>(),
        COLUMNS[4] => rows.iter().map(|r| r.abs_error).collect::<Vec<f64>>(),
        COLUMNS[5] => rows.iter().map(|r| r.rel_error).collect::<Vec<f64>>(),
    )?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(Some(4))
        .finish(&mut df)?;
    Ok(())
}

/// Write `<artifact>.meta.json` next to the CSV.
pub fn write_meta(artifact: &Path, meta: &RunMeta) -> Result<PathBuf> {
    let path = meta_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(&path, serde_json::to_vec_pretty(meta)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn meta_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("results"));
    let mut name = stem;
    name.push(".meta.json");
    artifact.with_file_name(name)
}
