// src/process/assemble.rs
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    output::{processed_path, write_atomically},
    process::{normalize::normalize_line, reshape::reshape_row},
};

/// The processed table: unified header plus ragged data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Counters gathered while assembling and writing one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    pub input_lines: usize,
    /// Widest normalized row, before the derived columns went in.
    pub max_columns: usize,
    pub decode_failures: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
}

/// Header for a file whose widest normalized row has `max_columns` fields.
///
/// Narrow files truncate the template (which already carries the three
/// derived names); wide files get `Column_N` names for the overflow, N
/// counting from one like a spreadsheet column.
pub fn unified_header(max_columns: usize, cfg: &Config) -> Vec<String> {
    let mut header = cfg.inserted_header();
    let base = cfg.base_header.len();
    if max_columns <= base {
        header.truncate(max_columns + cfg.derived_columns.len());
    } else {
        header.extend((base..max_columns).map(|i| format!("Column_{}", i + 1)));
    }
    header
}

/// Remove `index` from `fields` if present.
pub fn drop_column(fields: &mut Vec<String>, index: usize) {
    if index < fields.len() {
        fields.remove(index);
    }
}

/// Normalize and reshape every line, size the header from the widest row,
/// drop the first data row and the redundant column.
///
/// The first row of a gateway export is never a real record, so it is
/// discarded unconditionally. It still counts towards the header width.
pub fn assemble<I, S>(lines: I, cfg: &Config) -> (Table, TableStats)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = TableStats::default();
    let mut rows = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let tokens = normalize_line(line.as_ref(), &cfg.labels);
        stats.max_columns = stats.max_columns.max(tokens.len());

        let enriched = reshape_row(tokens, &cfg.layout);
        if let Some(e) = &enriched.decode_error {
            stats.decode_failures += 1;
            warn!(line = idx + 1, error = %e, "payload not decoded; keeping raw field");
        }
        rows.push(enriched.fields);
        stats.input_lines += 1;
    }

    let mut header = unified_header(stats.max_columns, cfg);
    debug!(
        max_columns = stats.max_columns,
        header_len = header.len(),
        "header sized"
    );

    if !rows.is_empty() {
        rows.remove(0);
    }

    let dropped = cfg.layout.dropped;
    drop_column(&mut header, dropped);
    for row in rows.iter_mut() {
        drop_column(row, dropped);
    }

    (Table { header, rows }, stats)
}

/// Encode one record into `enc`'s buffer and take the bytes back out, so
/// every record reaches the output in a single write.
fn encode_record(enc: &mut csv::Writer<Vec<u8>>, fields: &[String]) -> csv::Result<Vec<u8>> {
    enc.write_record(fields)?;
    enc.flush()?;
    // `csv::Writer` exposes no `get_mut`; copy the bytes out and restart the
    // encoder on an empty buffer with the same configuration.
    let bytes = enc.get_ref().clone();
    *enc = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    Ok(bytes)
}

/// Write `table` as CSV to `out`, one write per record. The header must
/// land; a data record that fails to encode or write is logged and skipped
/// without stopping the rest. Returns `(written, skipped)`.
pub fn write_rows<W: Write>(table: &Table, out: &mut W) -> Result<(usize, usize)> {
    let mut enc = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let header = encode_record(&mut enc, &table.header).context("encoding header")?;
    out.write_all(&header).context("writing header")?;

    let (mut written, mut skipped) = (0, 0);
    for row in &table.rows {
        let result = encode_record(&mut enc, row)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(out.write_all(&bytes)?));
        match result {
            Ok(()) => written += 1,
            Err(e) => {
                warn!(row = %row.join(","), error = %e, "skipping row");
                skipped += 1;
            }
        }
    }
    Ok((written, skipped))
}

/// Write `table` as CSV at `path`. Returns `(written, skipped)`.
pub fn write_table(table: &Table, path: &Path) -> Result<(usize, usize)> {
    write_atomically(path, |file| {
        let mut out = BufWriter::new(file);
        let counts = write_rows(table, &mut out)
            .with_context(|| format!("writing {:?}", path))?;
        out.flush()
            .with_context(|| format!("flushing {:?}", path))?;
        Ok(counts)
    })
}

/// Read a gateway log, assemble it and write `<stem>_processed.csv` beside it.
#[instrument(level = "info", skip(input, cfg), fields(path = %input.display()))]
pub fn process_file(input: &Path, cfg: &Config) -> Result<(PathBuf, TableStats)> {
    let bytes = fs::read(input).with_context(|| format!("reading {:?}", input))?;
    let text = String::from_utf8_lossy(&bytes);

    let (table, mut stats) = assemble(text.lines(), cfg);

    let out = processed_path(input);
    let (written, skipped) = write_table(&table, &out)?;
    stats.rows_written = written;
    stats.rows_skipped = skipped;

    info!(
        output = %out.display(),
        rows = written,
        skipped,
        "processed file saved"
    );
    Ok((out, stats))
}
