use std::path::PathBuf;

use crate::error::IngestError;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const DATA_DIR_VAR: &str = "DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Settings shared by the ingestion jobs, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub service_key: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration from the process environment.
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, IngestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IngestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(IngestError::MissingConfiguration(key))
        };

        let supabase_url = required(SUPABASE_URL_VAR)?;
        let service_key = required(SUPABASE_KEY_VAR)?;
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            service_key,
            data_dir,
        })
    }

    pub fn shots_file(&self, year: u16) -> PathBuf {
        self.data_dir
            .join("shot_charts")
            .join(format!("shots_{}.json", year))
    }

    pub fn per_game_file(&self) -> PathBuf {
        self.regular_season_dir().join("per_game.csv")
    }

    pub fn advanced_file(&self) -> PathBuf {
        self.regular_season_dir().join("advanced.csv")
    }

    fn regular_season_dir(&self) -> PathBuf {
        self.data_dir.join("regular-season")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_required_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://example.supabase.co/"),
            ("SUPABASE_SERVICE_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.supabase_url, "https://example.supabase.co");
        assert_eq!(config.service_key, "secret");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.shots_file(2013),
            PathBuf::from("data/shot_charts/shots_2013.json")
        );
        assert_eq!(
            config.per_game_file(),
            PathBuf::from("data/regular-season/per_game.csv")
        );
    }

    #[test]
    fn test_missing_url_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("SUPABASE_SERVICE_KEY", "secret")]))
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingConfiguration("SUPABASE_URL")
        ));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingConfiguration("SUPABASE_SERVICE_KEY")
        ));
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "secret"),
            ("DATA_DIR", "/tmp/exports"),
        ]))
        .unwrap();
        assert_eq!(
            config.advanced_file(),
            PathBuf::from("/tmp/exports/regular-season/advanced.csv")
        );
    }
}
