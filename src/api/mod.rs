pub mod supabase_api;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use supabase_api::SupabaseClient;

/// Failure reported by a destination store for one insert call
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Anything that can accept rows for a named table
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert all `rows` into `table` in a single call
    async fn insert(&self, table: &str, rows: &[Value]) -> Result<(), StoreError>;
}
