use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Shortest query that may reach the network.
pub const MIN_QUERY_LEN: usize = 3;
/// Most articles kept from a single response.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Settings for the news search endpoint.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, including the version segment and a trailing slash.
    pub base_url: String,
    /// API key sent as the `apiKey` query parameter.
    pub api_key: Option<String>,
    /// Upper bound on a single search request.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply the environment override for the API key, if present and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this (in characters) never hit the network.
    pub min_query_len: usize,
    /// Quiet period after the last keystroke before the request goes out.
    pub debounce_ms: u64,
    /// Number of articles kept from each response, in API order.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: MIN_QUERY_LEN,
            debounce_ms: 300,
            max_results: MAX_RESULTS,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Pull `min_query_len` up to [`MIN_QUERY_LEN`] and `max_results` into
    /// `1..=MAX_RESULTS`. Config may tighten these limits, never loosen them.
    pub fn clamped(mut self) -> Self {
        if self.min_query_len < MIN_QUERY_LEN {
            tracing::warn!(
                configured = self.min_query_len,
                "search.min_query_len below {}, clamping",
                MIN_QUERY_LEN
            );
            self.min_query_len = MIN_QUERY_LEN;
        }
        let max_results = self.max_results.clamp(1, MAX_RESULTS);
        if max_results != self.max_results {
            tracing::warn!(
                configured = self.max_results,
                "search.max_results outside 1..={}, clamping",
                MAX_RESULTS
            );
            self.max_results = max_results;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the favorites slot. Defaults to `<config dir>/news-tracker`.
    pub directory: Option<String>,
    /// Name of the slot the favorites blob is written to.
    pub favorites_slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            favorites_slot: "favorites".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn resolve_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(dir) => Some(PathBuf::from(dir)),
            None => dirs::config_dir().map(|dir| dir.join("news-tracker")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Per-module overrides, e.g. `{"news_tracker::api": "debug"}`.
    pub module_levels: HashMap<String, String>,
    pub log_directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_levels: HashMap::new(),
            log_directory: None,
        }
    }
}

impl LoggingConfig {
    /// Build an `EnvFilter` directive string from the level and module overrides.
    pub fn filter_directive(&self) -> String {
        let mut filter = self.level.clone();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter.push_str(&format!(",{}={}", module, level));
        }
        filter
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if let Some(config) = Self::load_from(&path) {
                return config;
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default().with_env_overrides()
    }

    /// Parse a single config file. Returns `None` when it is missing or invalid.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(path).ok()?;
        match ron::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config.with_env_overrides())
            }
            Err(e) => {
                tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        }
    }

    fn with_env_overrides(mut self) -> Self {
        self.api = self.api.with_env_overrides();
        self.search = self.search.clamped();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://newsapi.org/v2/");
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.storage.favorites_slot, "favorites");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config: AppConfig = ron::from_str(
            r#"(
    // Only override the timeout
    api: (timeout_secs: 3),
    search: (debounce_ms: 0),
)"#,
        )
        .unwrap();

        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.debounce(), Duration::ZERO);
        assert_eq!(config.search.min_query_len, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(br#"(storage: (directory: Some("/tmp/nt"), favorites_slot: "favs"))"#)
                .unwrap();
        }

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.directory.as_deref(), Some("/tmp/nt"));
        assert_eq!(config.storage.favorites_slot, "favs");
    }

    #[test]
    fn test_load_from_invalid_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "not ron at all {").unwrap();
        assert!(AppConfig::load_from(&path).is_none());
        assert!(AppConfig::load_from(&dir.path().join("missing.ron")).is_none());
    }

    #[test]
    fn test_load_from_clamps_search_limits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(search: (min_query_len: 0, max_results: 50))").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.search.min_query_len, MIN_QUERY_LEN);
        assert_eq!(config.search.max_results, MAX_RESULTS);
    }

    #[test]
    fn test_clamped_keeps_stricter_values() {
        let search = SearchConfig {
            min_query_len: 5,
            debounce_ms: 0,
            max_results: 0,
        }
        .clamped();
        assert_eq!(search.min_query_len, 5);
        assert_eq!(search.max_results, 1);
    }

    #[test]
    fn test_filter_directive() {
        let mut logging = LoggingConfig::default();
        logging
            .module_levels
            .insert("news_tracker::api".to_string(), "debug".to_string());
        assert_eq!(logging.filter_directive(), "info,news_tracker::api=debug");
    }
}
