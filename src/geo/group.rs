// src/geo/group.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, io::Read, path::Path, path::PathBuf};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    config::{Config, GroupStyle, Layout},
    error::PointError,
    geo::kml::{GeoPoint, GeoWriter},
    output::geo_path,
};

/// Points collected for one content code.
#[derive(Debug, Clone)]
pub struct PointGroup {
    pub style: GroupStyle,
    pub points: Vec<GeoPoint>,
}

/// Outcome of one export: files written and per-group point counts.
#[derive(Debug, Clone, Default)]
pub struct GeoExport {
    pub files: Vec<PathBuf>,
    pub counts: Vec<(String, usize)>,
    pub rows_skipped: usize,
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &'static str,
) -> Result<&'r str, PointError> {
    record
        .get(index)
        .ok_or(PointError::MissingField { index, name })
}

fn coordinate(record: &StringRecord, index: usize, name: &'static str) -> Result<f64, PointError> {
    let raw = field(record, index, name)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PointError::BadCoordinate {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Read latitude, longitude and timestamp from a processed-table row.
pub fn parse_point(record: &StringRecord, layout: &Layout) -> Result<GeoPoint, PointError> {
    Ok(GeoPoint {
        latitude: coordinate(record, layout.latitude, "latitude")?,
        longitude: coordinate(record, layout.longitude, "longitude")?,
        timestamp: field(record, layout.timestamp, "timestamp")?.to_string(),
    })
}

/// Bucket the rows of a processed table by content code, one group per
/// configured code, in configuration order. Groups may come back empty.
///
/// Returns the groups and the number of rows skipped for bad coordinates.
pub fn group_points<R: Read>(reader: R, cfg: &Config) -> Result<(Vec<PointGroup>, usize)> {
    let mut groups: Vec<PointGroup> = cfg
        .groups
        .iter()
        .map(|style| PointGroup {
            style: style.clone(),
            points: Vec::new(),
        })
        .collect();
    let mut skipped = 0;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => {
                return Err(e).context("reading processed table");
            }
            Err(e) => {
                warn!(row = idx + 1, error = %e, "unreadable row");
                skipped += 1;
                continue;
            }
        };

        let code = record.get(cfg.layout.content_code).unwrap_or("");
        let Some(group) = groups.iter_mut().find(|g| g.style.code == code) else {
            trace!(row = idx + 1, code, "no group for content code");
            continue;
        };

        match parse_point(&record, &cfg.layout) {
            Ok(point) => group.points.push(point),
            Err(e) => {
                warn!(row = idx + 1, error = %e, "skipping row without usable coordinates");
                skipped += 1;
            }
        }
    }

    Ok((groups, skipped))
}

/// Read the processed table at `processed` and hand every non-empty group
/// to `writer` as `<stem>_<SUFFIX>.kml`. Empty groups produce no file.
#[instrument(level = "info", skip(processed, cfg, writer), fields(path = %processed.display()))]
pub fn export_groups(processed: &Path, cfg: &Config, writer: &dyn GeoWriter) -> Result<GeoExport> {
    let file = File::open(processed).with_context(|| format!("opening {:?}", processed))?;
    let (groups, rows_skipped) = group_points(file, cfg)?;

    let mut export = GeoExport {
        rows_skipped,
        ..Default::default()
    };
    for group in groups {
        export
            .counts
            .push((group.style.code.clone(), group.points.len()));
        if group.points.is_empty() {
            debug!(code = %group.style.code, "no points; no file");
            continue;
        }

        let path = geo_path(processed, &group.style.suffix);
        writer.write_group(&group.style, &group.points, &path)?;
        info!(
            output = %path.display(),
            points = group.points.len(),
            "KML file saved"
        );
        export.files.push(path);
    }

    Ok(export)
}
