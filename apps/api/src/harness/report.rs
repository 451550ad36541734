//! Writes per-strategy result tables and the consolidated summary to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::harness::runner::{StrategyRun, StrategySummary};

pub const SUMMARY_FILE: &str = "summary.json";

/// One line of `summary.json`.
#[derive(Debug, Serialize)]
pub struct SummaryRecord<'a> {
    #[serde(flatten)]
    pub summary: &'a StrategySummary,
    pub outfile: String,
}

pub fn results_path(out_dir: &Path, run: &StrategyRun) -> PathBuf {
    out_dir.join(format!("results_{}.json", run.strategy.name()))
}

/// Writes `results_<strategy>.json` for every run plus `summary.json`.
/// Returns the summary path.
pub fn write_report(out_dir: &Path, runs: &[StrategyRun]) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut records = Vec::with_capacity(runs.len());
    for run in runs {
        let path = results_path(out_dir, run);
        write_json(&path, &run.results)?;
        info!("Wrote {} rows to {}", run.results.len(), path.display());
        records.push(SummaryRecord {
            summary: &run.summary,
            outfile: path.display().to_string(),
        });
    }

    let summary_path = out_dir.join(SUMMARY_FILE);
    write_json(&summary_path, &records)?;
    Ok(summary_path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
