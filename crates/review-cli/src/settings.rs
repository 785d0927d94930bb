//! Layered settings for the review trend tool.

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use review_embeddings::EmbeddingsConfig;
use review_topics::TopicsConfig;

const APP_NAME: &str = "review-trends";

/// Environment variable prefix: `REVIEW_TRENDS_CATALOG_PATH`,
/// `REVIEW_TRENDS_TOPICS__DEDUP__SIMILARITY_THRESHOLD`, ...
pub const ENV_PREFIX: &str = "REVIEW_TRENDS";

/// Settings for every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Topic catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Trend table CSV file
    #[serde(default = "default_trend_path")]
    pub trend_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Clustering, dedup and normalizer settings
    #[serde(default)]
    pub topics: TopicsConfig,

    /// Vectorizer settings
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
}

fn data_file(name: &str) -> String {
    ProjectDirs::from("", "", APP_NAME)
        .map(|p| p.data_local_dir().join(name))
        .unwrap_or_else(|| PathBuf::from("./data").join(name))
        .to_string_lossy()
        .to_string()
}

fn default_catalog_path() -> String {
    data_file("topic_memory.json")
}

fn default_trend_path() -> String {
    data_file("trend_data.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            trend_path: default_trend_path(),
            log_level: default_log_level(),
            topics: TopicsConfig::default(),
            embeddings: EmbeddingsConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/review-trends/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (REVIEW_TRENDS_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> anyhow::Result<Self> {
        let config_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("catalog_path", default_catalog_path())?
            .set_default("trend_path", default_trend_path())?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Double underscore separates nested keys so single underscores
        // can stay inside field names.
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.topics.validate()?;
        Ok(settings)
    }

    pub fn catalog_path(&self) -> PathBuf {
        expand_home(&self.catalog_path)
    }

    pub fn trend_path(&self) -> PathBuf {
        expand_home(&self.trend_path)
    }
}

/// Expand a leading `~/`.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_embeddings::VectorizerKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert!(settings.catalog_path.ends_with("topic_memory.json"));
        assert!(settings.trend_path.ends_with("trend_data.csv"));
        assert!((settings.topics.extraction.distance_threshold - 0.5).abs() < f64::EPSILON);
        assert!((settings.topics.dedup.similarity_threshold - 0.85).abs() < f32::EPSILON);
        assert_eq!(settings.embeddings.kind, VectorizerKind::Hashing);
    }

    #[test]
    fn test_load_from_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
catalog_path = "/tmp/reviews/catalog.json"
log_level = "debug"

[topics.extraction]
distance_threshold = 0.7

[[topics.normalizer.rules]]
triggers = ["refund"]
canonical = "Refund requests"

[embeddings]
dimension = 64
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(settings.catalog_path, "/tmp/reviews/catalog.json");
        assert_eq!(settings.log_level, "debug");
        assert!((settings.topics.extraction.distance_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.topics.normalizer.rules.len(), 1);
        assert_eq!(settings.topics.normalizer.rules[0].canonical, "Refund requests");
        assert_eq!(settings.embeddings.dimension, 64);
        assert!(settings.trend_path.ends_with("trend_data.csv"));
    }

    #[test]
    fn test_missing_cli_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        assert!(Settings::load(Some(&path.to_string_lossy())).is_err());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[topics.extraction]\ndistance_threshold = -1.0\n").unwrap();
        assert!(Settings::load(Some(&path.to_string_lossy())).is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path.csv"), PathBuf::from("/abs/path.csv"));
        if let Some(base) = BaseDirs::new() {
            assert_eq!(expand_home("~/x.json"), base.home_dir().join("x.json"));
        }
    }

    #[test]
    fn test_settings_render_as_toml() {
        let rendered = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(rendered.contains("catalog_path"));
        assert!(rendered.contains("distance_threshold = 0.5"));
    }
}
