/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: foodfinder.toml (in working directory)
/// 3. Environment variables: prefixed FOODFINDER_, nested keys joined
///    with __ (e.g., FOODFINDER_SEARCH__BASE_URL=http://host/api/search)

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use crate::errors::FinderError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional file path for log output (in addition to stderr)
    #[serde(default)]
    pub log_file: Option<String>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub location: LocationConfig,
}

/// Upstream search service settings, thresholds included.
///
/// The two score floors are part of the service contract: the search
/// side tunes them, the ranking side never sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint queried as {base_url}?q={query}
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Hits below this relevance are dropped. Zero or negative disables.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Lower floor applied when the query text appears in the hit's
    /// name or menu
    #[serde(default = "default_min_score_keyword_match")]
    pub min_score_keyword_match: f64,

    /// Results per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Fallback coordinates and the radius applied when one is in effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// Radius cap in km used when a location resolves and the user set
    /// no explicit cap
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000/api/search".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_score() -> f64 {
    0.35
}

fn default_min_score_keyword_match() -> f64 {
    0.2
}

fn default_page_size() -> usize {
    12
}

fn default_radius_km() -> f64 {
    5.0
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            log_file: None,
            search: SearchConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            min_score: default_min_score(),
            min_score_keyword_match: default_min_score_keyword_match(),
            page_size: default_page_size(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            lat: None,
            lon: None,
            default_radius_km: default_radius_km(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: FOODFINDER_LOG_LEVEL=debug overrides log_level in
    /// foodfinder.toml
    pub fn load() -> Result<Config, FinderError> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("foodfinder.toml"))
            .merge(Env::prefixed("FOODFINDER_").split("__"))
            .extract()
            .map_err(|e| FinderError::Config(format!("Failed to load config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_file, None);
        assert_eq!(config.search.base_url, "http://localhost:5000/api/search");
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.search.page_size, 12);
        assert!((config.search.min_score - 0.35).abs() < 1e-10);
        assert!((config.search.min_score_keyword_match - 0.2).abs() < 1e-10);
        assert_eq!(config.location.lat, None);
        assert!((config.location.default_radius_km - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_toml_overrides_defaults_per_key() {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                log_level = "debug"

                [search]
                base_url = "http://10.0.0.2:5000/api/search"
                min_score = 0.5

                [location]
                lat = 10.77
                lon = 106.69
                "#,
            ))
            .extract()
            .expect("Failed to parse config");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.search.base_url, "http://10.0.0.2:5000/api/search");
        assert!((config.search.min_score - 0.5).abs() < 1e-10);
        // Untouched keys keep their defaults
        assert_eq!(config.search.page_size, 12);
        assert_eq!(config.location.lat, Some(10.77));
    }
}
