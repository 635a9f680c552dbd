//! CSV preprocessing: rewrite raw input files into load-ready siblings.
//!
//! The source files are loosely formatted — stray whitespace around fields
//! and around the `;`-separated author names, mixed case. Each file is
//! rewritten field-by-field into a `processed_<name>` sibling whose data
//! lines are trimmed and lower-cased, so later exact-match key lookups are
//! case-insensitive. The header line passes through verbatim.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Prefix of the normalized temporary files.
pub const PROCESSED_PREFIX: &str = "processed_";

/// Index of the `;`-separated author list in every input row.
const AUTHORS_FIELD: usize = 1;

/// All `*.csv` files directly inside `dir` (non-recursive), sorted by name.
/// Earlier `processed_*` output is temp data, not input, and is skipped.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(PROCESSED_PREFIX) {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Rewrite `src` into its normalized `processed_<name>` sibling.
///
/// The output is created fresh (a stale leftover from an aborted run must
/// not be appended to) and is fully flushed and closed before this function
/// returns, so a reader opening the returned path sees the complete file.
/// A malformed row aborts the whole file; the partial output is removed
/// best-effort and the error is returned for the caller to log and skip.
pub fn preprocess_file(src: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::InvalidPath(src.to_path_buf()))?;
    let dst = src.with_file_name(format!("{PROCESSED_PREFIX}{file_name}"));

    match normalize_into(src, &dst, file_name) {
        Ok(()) => Ok(dst),
        Err(e) => {
            if dst.exists() {
                if let Err(rm_err) = fs::remove_file(&dst) {
                    tracing::warn!(
                        file = %dst.display(),
                        error = %rm_err,
                        "Failed to remove partial output"
                    );
                }
            }
            Err(e)
        }
    }
}

fn normalize_into(src: &Path, dst: &Path, file_name: &str) -> Result<()> {
    let reader = BufReader::new(File::open(src)?);
    let mut writer = BufWriter::new(File::create(dst)?);

    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(header) => header?,
        None => {
            return Err(PipelineError::MalformedRow {
                file: file_name.to_string(),
                line: 1,
                reason: "empty file, expected a header line".to_string(),
            })
        }
    };
    writeln!(writer, "{header}")?;

    for (idx, line) in lines.enumerate() {
        let line = line?;
        let normalized =
            normalize_line(&line).map_err(|reason| PipelineError::MalformedRow {
                file: file_name.to_string(),
                line: idx + 2,
                reason,
            })?;
        writeln!(writer, "{normalized}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Normalize one data line: trim every field, split-trim-rejoin the author
/// field on `;`, rejoin with `,`, lower-case the result.
fn normalize_line(line: &str) -> std::result::Result<String, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() <= AUTHORS_FIELD {
        return Err(format!(
            "expected at least {} comma-separated fields, found {}",
            AUTHORS_FIELD + 1,
            fields.len()
        ));
    }

    let rebuilt: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            if i == AUTHORS_FIELD {
                field
                    .split(';')
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join(";")
            } else {
                field.trim().to_string()
            }
        })
        .collect();

    Ok(rebuilt.join(",").to_lowercase())
}
