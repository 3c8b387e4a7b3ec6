//! Configuration and catalog factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use semplan_core::semester::ProgramStart;
use semplan_core::traits::ModuleCatalog;

use crate::http::{HttpCatalog, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Where module data comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Catalog edition to query, e.g. `2024-2025`.
    #[serde(default = "default_academic_year")]
    pub academic_year: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            academic_year: default_academic_year(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level semplan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemplanConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Directory holding the plan records.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for SemplanConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// The academic year currently under way, as `YYYY-YYYY`.
fn default_academic_year() -> String {
    let start = 2000 + ProgramStart::current().year() as u16;
    format!("{}-{}", start, start + 1)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("semplan"),
        Err(_) => PathBuf::from(".semplan"),
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `semplan.toml` in the current directory
/// 2. `~/.config/semplan/config.toml`
///
/// Environment variable overrides: `SEMPLAN_CATALOG_URL`,
/// `SEMPLAN_ACADEMIC_YEAR`, `SEMPLAN_DATA_DIR`.
pub fn load_config() -> Result<SemplanConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SemplanConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("semplan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SemplanConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SemplanConfig::default(),
    };

    if let Ok(url) = std::env::var("SEMPLAN_CATALOG_URL") {
        config.catalog.base_url = url;
    }
    if let Ok(year) = std::env::var("SEMPLAN_ACADEMIC_YEAR") {
        config.catalog.academic_year = year;
    }
    if let Ok(dir) = std::env::var("SEMPLAN_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.catalog.base_url = resolve_env_vars(&config.catalog.base_url);
    config.catalog.academic_year = resolve_env_vars(&config.catalog.academic_year);
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("semplan"))
}

/// Create the catalog client described by `config`.
pub fn create_catalog(config: &CatalogConfig) -> Result<Arc<dyn ModuleCatalog>> {
    let catalog = HttpCatalog::new(&config.base_url, &config.academic_year, config.timeout_secs)
        .with_context(|| format!("failed to create catalog client for {}", config.base_url))?;
    Ok(Arc::new(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_SEMPLAN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_SEMPLAN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_SEMPLAN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_SEMPLAN_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = SemplanConfig::default();
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.catalog.academic_year.len(), 9);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/var/lib/semplan"

[catalog]
academic_year = "2023-2024"
"#;
        let config: SemplanConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/semplan"));
        assert_eq!(config.catalog.academic_year, "2023-2024");
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/semplan.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semplan.toml");
        std::fs::write(
            &path,
            "[catalog]\nbase_url = \"http://localhost:8080/v2\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.catalog.timeout_secs, 5);
        assert!(create_catalog(&config.catalog).is_ok());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[catalog\n").unwrap();

        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}
