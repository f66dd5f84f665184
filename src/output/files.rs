//! Writing generated configs and the run report to disk.

use crate::config::OUTPUT_FILE_SUFFIX;
use crate::error::{GenError, Result};
use crate::models::Diagnostic;
use crate::Generation;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of one run, written as JSON next to the configs.
#[derive(Serialize, Debug)]
pub struct Report<'a> {
    pub generated_at: String,
    pub topology: String,
    pub topology_reason: &'a str,
    pub table_layout: String,
    pub outputs: Vec<ReportOutput<'a>>,
    pub diagnostics: &'a [Diagnostic],
}

#[derive(Serialize, Debug)]
pub struct ReportOutput<'a> {
    pub key: &'a str,
    pub line: usize,
    pub file: String,
}

/// File name used for an output key.
pub fn config_file_name(key: &str) -> String {
    format!("{key}{OUTPUT_FILE_SUFFIX}")
}

fn io_error(path: &Path, source: std::io::Error) -> GenError {
    GenError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write one file per config into `dir`, creating it when needed.
pub fn write_configs(generation: &Generation, dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!("#Start write_configs() dir={}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut written = Vec::with_capacity(generation.output.configs.len());
    for config in generation.output.configs.iter() {
        let path = dir.join(config_file_name(&config.key));
        std::fs::write(&path, &config.text).map_err(|e| io_error(&path, e))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Write `generation_report_<date>.json` into `dir`.
pub fn write_report(generation: &Generation, dir: &Path) -> Result<PathBuf> {
    let now = chrono::Local::now();
    let report = Report {
        generated_at: now.to_rfc3339(),
        topology: generation.detection.kind.to_string(),
        topology_reason: &generation.detection.reason,
        table_layout: format!("{:?}", generation.strategy),
        outputs: generation
            .output
            .configs
            .iter()
            .map(|c| ReportOutput {
                key: &c.key,
                line: c.line,
                file: config_file_name(&c.key),
            })
            .collect(),
        diagnostics: &generation.diagnostics,
    };

    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(format!("generation_report_{}.json", now.format("%Y-%m-%d")));
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| GenError::Config(format!("Error serializing report: {e}")))?;
    log::warn!("Writing report to {}", path.display());
    std::fs::write(&path, json).map_err(|e| io_error(&path, e))?;
    Ok(path)
}
