use std::path::PathBuf;
use thiserror::Error;

use crate::api::StoreError;

/// Errors raised while normalizing and loading stat exports
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed game descriptor {descriptor:?}: {reason}")]
    MalformedGameDescriptor { descriptor: String, reason: String },

    #[error("failed to transform row (season {season:?}, team {team:?}): {detail}")]
    RowTransform {
        season: String,
        team: String,
        detail: String,
    },

    #[error("insert into {table} rejected: {source}")]
    BatchInsert {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("missing configuration: {0} must be set")]
    MissingConfiguration(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize records for {table}: {source}")]
    Serialize {
        table: String,
        source: serde_json::Error,
    },
}

impl IngestError {
    pub fn malformed_game(descriptor: &str, reason: impl Into<String>) -> Self {
        IngestError::MalformedGameDescriptor {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}
