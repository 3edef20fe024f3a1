pub mod init;
mod schema;
mod validation;

pub use schema::{CacheSettings, Config, FetchConfig};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset used when neither the config nor the command line names one.
pub const DEFAULT_DATASET_PATH: &str = "data/pe_funds.json";

/// Resolve [`DEFAULT_DATASET_PATH`] against the working directory, falling back
/// to the copy shipped next to the crate manifest.
pub fn default_dataset_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_DATASET_PATH);
    if local.exists() {
        return local;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATASET_PATH)
}

/// Get the config directory path (~/.config/pe-shortlist/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("pe-shortlist"))
        .unwrap_or_else(|| PathBuf::from(".pe-shortlist"))
}

/// Get the default config file path (~/.config/pe-shortlist/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pe-shortlist/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; defaults are used.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    load_config_file(&config_path)
}

fn load_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_path_is_error() {
        let path = env::temp_dir().join("pe_shortlist_test_no_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_file() {
        let path = env::temp_dir().join("pe_shortlist_test_config.yaml");
        fs::write(&path, "top_k: 7\nmodel: gpt-4o\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.top_k, 7);
        assert_eq!(config.model, "gpt-4o");
        assert!(config.cache.enabled);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("pe_shortlist_test_bad_config.yaml");
        fs::write(&path, "top_k: [unclosed\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_default_dataset_path_resolves_bundled_file() {
        let path = default_dataset_path();
        assert!(path.ends_with(DEFAULT_DATASET_PATH));
        assert!(path.exists(), "missing {}", path.display());

        let dataset = crate::model::FundDataset::load(&path).unwrap();
        assert!(!dataset.is_empty());
    }
}
