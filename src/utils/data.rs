use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::IngestError;
use crate::models::RawShot;
use crate::utils::stat_rows::CsvRow;

/// Load a per-season shot chart export
pub fn load_shots(path: &Path) -> Result<Vec<RawShot>, IngestError> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a stat export into header-keyed rows, trimming every cell
pub fn read_csv_rows(path: &Path) -> Result<Vec<CsvRow>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_rows_from_reader(file).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_csv_rows_from_reader<R: Read>(rdr: R) -> Result<Vec<CsvRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Blank lines come through as a single empty field
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Write any serializable value as pretty JSON
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
