use serde::Serialize;
use serde_json::Value;
use std::ops::Range;
use tracing::{error, info};

use crate::api::RecordStore;
use crate::error::IngestError;

/// Rows per insert call for the shots table
pub const SHOT_BATCH_SIZE: usize = 100;

/// Outcome of a chunked load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub batches: usize,
    pub failed_ranges: Vec<Range<usize>>,
}

impl BatchReport {
    pub fn format(&self) -> String {
        format!(
            "{} of {} records inserted ({} failed across {} of {} batches)",
            self.succeeded,
            self.total,
            self.failed,
            self.failed_ranges.len(),
            self.batches
        )
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

fn to_rows<T: Serialize>(table: &str, records: &[T]) -> Result<Vec<Value>, IngestError> {
    records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| IngestError::Serialize {
            table: table.to_string(),
            source,
        })
}

/// Insert `records` in order, `batch_size` at a time.
/// A rejected chunk is logged and skipped; later chunks still run.
pub async fn load_in_batches<S, T>(
    store: &S,
    table: &str,
    records: &[T],
    batch_size: usize,
) -> Result<BatchReport, IngestError>
where
    S: RecordStore + ?Sized,
    T: Serialize,
{
    let rows = to_rows(table, records)?;
    let batch_size = batch_size.max(1);
    let mut report = BatchReport {
        total: rows.len(),
        ..Default::default()
    };

    for (index, chunk) in rows.chunks(batch_size).enumerate() {
        let start = index * batch_size;
        let range = start..start + chunk.len();
        report.batches += 1;

        match store.insert(table, chunk).await {
            Ok(()) => {
                report.succeeded += chunk.len();
                info!(
                    "Uploaded {} rows to {} ({}/{})",
                    chunk.len(),
                    table,
                    range.end,
                    report.total
                );
            }
            Err(e) => {
                error!(
                    "Failed to upload rows {}..{} to {}: {}",
                    range.start, range.end, table, e
                );
                report.failed += chunk.len();
                report.failed_ranges.push(range);
            }
        }
    }

    Ok(report)
}

/// Insert every record in one call; any rejection is returned to the caller
pub async fn load_all<S, T>(store: &S, table: &str, records: &[T]) -> Result<usize, IngestError>
where
    S: RecordStore + ?Sized,
    T: Serialize,
{
    let rows = to_rows(table, records)?;
    store
        .insert(table, &rows)
        .await
        .map_err(|source| IngestError::BatchInsert {
            table: table.to_string(),
            source,
        })?;
    info!("Uploaded {} rows to {}", rows.len(), table);
    Ok(rows.len())
}
