//! Application configuration.
//!
//! Resolution order, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. The TOML file given with `--config`, or `./envelope.toml` if present
//! 3. `ENVELOPE_*` environment variables (`ENVELOPE_PAGE_SIZE=8`)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use envelope_core::layers::DEFAULT_PAGE_SIZE;

/// Default config file name, looked up in the working directory
const DEFAULT_CONFIG_NAME: &str = "envelope";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Layers per page for `layer list|move|delete`
    pub page_size: usize,

    /// JSON catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Name written into project lock files
    pub user_id: String,
}

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            page_size: DEFAULT_PAGE_SIZE,
            catalog_path: None,
            user_id: default_user(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
            .set_default("user_id", default_user())?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix("ENVELOPE").try_parsing(true))
            .build()
            .context("reading configuration")?;
        let app: AppConfig = config.try_deserialize().context("invalid configuration")?;
        anyhow::ensure!(app.page_size > 0, "page_size must be at least 1");
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 5);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "page_size = 8").unwrap();
        writeln!(file, "catalog_path = \"materials.json\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.catalog_path, Some(PathBuf::from("materials.json")));
        assert!(!config.user_id.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/envelope.toml"))).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "page_size = 0").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
