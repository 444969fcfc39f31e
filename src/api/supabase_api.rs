use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{RecordStore, StoreError};
use crate::config::Config;

const REST_PATH: &str = "rest/v1";

/// Writes rows through the Supabase PostgREST endpoint
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.supabase_url.clone(), config.service_key.clone())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }
}

#[async_trait]
impl RecordStore for SupabaseClient {
    async fn insert(&self, table: &str, rows: &[Value]) -> Result<(), StoreError> {
        let url = self.table_url(table);
        debug!("POST {} ({} rows)", url, rows.len());

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let client = SupabaseClient::new(
            "https://example.supabase.co/".to_string(),
            "key".to_string(),
        );
        assert_eq!(
            client.table_url("shots"),
            "https://example.supabase.co/rest/v1/shots"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_insert_against_live_project() {
        dotenv::dotenv().ok();
        let config = Config::from_env().expect("SUPABASE_URL / SUPABASE_SERVICE_KEY not set");
        let client = SupabaseClient::from_config(&config);

        let result = client
            .insert("shots", &[json!({ "x": 0.0, "y": 0.0, "shot_type": "miss" })])
            .await;
        assert!(result.is_ok());
    }
}
