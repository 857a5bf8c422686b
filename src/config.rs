use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// JSON array of listings. Built-in sample data when unset.
    pub data: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stack every field in one column instead of two
    pub single_column: bool,
    /// Seconds during which repeated model fetches for one make are deduplicated
    pub dedup_window_secs: u64,
    /// Reset the model to "all" when a fetched list no longer contains it
    pub snap_model_to_all: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            data: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            single_column: false,
            dedup_window_secs: 60,
            snap_model_to_all: false,
        }
    }
}

impl SearchConfig {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.addr(), "127.0.0.1:3000");
        assert_eq!(config.search.dedup_window(), Duration::from_secs(60));
        assert!(!config.search.single_column);
        assert!(!config.search.snap_model_to_all);
        assert!(config.server.data.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [server]
            port = 8080

            [search]
            single_column = true
            "#,
        )
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert!(config.search.single_column);
        assert_eq!(config.search.dedup_window_secs, 60);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\ndata = \"cars.json\"\n[search]\ndedup_window_secs = 5").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.data, Some(PathBuf::from("cars.json")));
        assert_eq!(config.search.dedup_window(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::parse("[server]\nport = \"eighty\"").is_err());
    }
}
