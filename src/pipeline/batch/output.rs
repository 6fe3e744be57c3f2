//! Result table and report writers.
//!
//! Every file is written to a temporary sibling and renamed into place, so a
//! failed run never leaves a half-written result behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::aggregate::{BatchStatistics, OutputRow};
use super::error::OutputError;

/// Write `bytes` to `path` via a temp file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Header row first, then one row per outcome in input order.
pub fn write_results_csv(path: &Path, rows: &[OutputRow]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(["raw_name", "clean_name", "gender_pred", "confidence", "status"])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))?;

    write_atomically(path, &bytes)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Results written");
    Ok(())
}

pub fn write_report(
    stats_path: &Path,
    output_path: &Path,
    stats: &BatchStatistics,
) -> Result<(), OutputError> {
    let output_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_path.display().to_string());

    let mut report = stats.render(&output_name);
    report.push('\n');
    write_atomically(stats_path, report.as_bytes())?;
    tracing::info!(path = %stats_path.display(), "Statistics report written");
    Ok(())
}

/// `results.csv` → `results_stats.txt`; other names get `_stats.txt` appended.
pub fn stats_path_for(output: &Path) -> PathBuf {
    let is_csv = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let base = if is_csv {
        output.with_extension("")
    } else {
        output.to_path_buf()
    };
    let mut name = base.into_os_string();
    name.push("_stats.txt");
    PathBuf::from(name)
}
