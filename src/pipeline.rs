// src/pipeline.rs
use anyhow::Result;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, instrument};

use crate::{
    config::Config,
    geo::{export_groups, GeoWriter},
    process::process_file,
};

/// What one run read, wrote and skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub processed: PathBuf,
    pub input_lines: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
    pub decode_failures: usize,
    pub geo_rows_skipped: usize,
    /// Point count per content code.
    pub groups: BTreeMap<String, usize>,
    pub geo_files: Vec<PathBuf>,
}

/// Process `input` into `<stem>_processed.csv`, then export its point
/// groups through `writer`.
#[instrument(level = "info", skip(input, cfg, writer), fields(path = %input.display()))]
pub fn run(input: &Path, cfg: &Config, writer: &dyn GeoWriter) -> Result<RunSummary> {
    let start = Instant::now();

    let (processed, stats) = process_file(input, cfg)?;
    let export = export_groups(&processed, cfg, writer)?;

    info!(elapsed = ?start.elapsed(), "run complete");
    Ok(RunSummary {
        input: input.to_path_buf(),
        processed,
        input_lines: stats.input_lines,
        rows_written: stats.rows_written,
        rows_skipped: stats.rows_skipped,
        decode_failures: stats.decode_failures,
        geo_rows_skipped: export.rows_skipped,
        groups: export.counts.into_iter().collect(),
        geo_files: export.files,
    })
}
