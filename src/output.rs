// src/output.rs
use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

/// `<dir>/<stem>_processed.csv` for an input at `<dir>/<stem>.<ext>`.
pub fn processed_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_processed.csv", stem(input)))
}

/// `<dir>/<stem>_<suffix>.kml` for a processed table at `<dir>/<stem>.csv`.
pub fn geo_path(processed: &Path, suffix: &str) -> PathBuf {
    processed.with_file_name(format!("{}_{}.kml", stem(processed), suffix))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write `path` through a hidden `.<name>.tmp` sibling, renamed over the
/// target only once `write` has succeeded. The temp file is created like
/// any other output, so the result gets the usual umask permissions.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut File) -> Result<T>,
{
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", name));

    let written = File::create(&tmp_path)
        .with_context(|| format!("creating {:?}", tmp_path))
        .and_then(|mut tmp| {
            let value = write(&mut tmp)?;
            tmp.sync_all()
                .with_context(|| format!("syncing {:?}", tmp_path))?;
            Ok(value)
        });

    match written {
        Ok(value) => {
            fs::rename(&tmp_path, path)
                .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
            Ok(value)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}
