use dcdl_common::{
    config_dir,
    log::{debug, warn},
};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{SiteConfig, DEFAULT_CONFIG};
use crate::error::ExtractorError;

const SAMPLE_CONFIG_TOML: &str = include_str!("sample.toml");

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Parses a config file body. Keys that are missing keep their default values.
pub fn parse_config(contents: &str) -> Result<SiteConfig, ExtractorError> {
    let config: SiteConfig = toml::from_str(contents)?;
    Ok(config)
}

/// Reads the config file at `path`.
pub async fn read_config_file(path: &Path) -> Result<SiteConfig, ExtractorError> {
    let contents = fs::read_to_string(path).await?;
    let config = parse_config(&contents)?;
    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Default location of the config file, see [`config_dir`].
pub fn default_config_path() -> Result<PathBuf, ExtractorError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the site config.
///
/// An explicit `custom_path` must exist. Without one, the default location is used, and a
/// commented sample is written there first if the file doesn't exist yet. When the default
/// location can't be used at all, the built-in [`DEFAULT_CONFIG`] applies.
pub async fn load_config(custom_path: Option<&Path>) -> Result<SiteConfig, ExtractorError> {
    if let Some(path) = custom_path {
        return read_config_file(path).await;
    }

    let path = match default_config_path() {
        Ok(path) => path,
        Err(error) => {
            warn!("No config directory available ({error}), using defaults");
            return Ok(DEFAULT_CONFIG.clone());
        }
    };

    if !path.exists() {
        debug!("Writing sample config to {}", path.display());
        if let Err(error) = fs::write(&path, SAMPLE_CONFIG_TOML).await {
            warn!("Failed to write sample config to {}: {error}", path.display());
            return Ok(DEFAULT_CONFIG.clone());
        }
    }

    read_config_file(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_parses_to_defaults() {
        assert_eq!(parse_config(SAMPLE_CONFIG_TOML).unwrap(), SiteConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = parse_config("retries = 1\nrequest_delay_ms = 250\n").unwrap();
        assert_eq!(config.retries, 1);
        assert_eq!(
            config.request_delay(),
            Some(std::time::Duration::from_millis(250))
        );
        assert_eq!(config.root, "https://gall.dcinside.com");
        assert_eq!(config.referer(), "https://gall.dcinside.com/");
    }

    #[test]
    fn invalid_config_is_an_error() {
        assert!(matches!(
            parse_config("retries = \"many\""),
            Err(ExtractorError::ConfigParseFail { .. })
        ));
    }

    #[tokio::test]
    async fn missing_custom_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/dcdl/config.toml"))).await;
        assert!(matches!(result, Err(ExtractorError::ConfigIOError { .. })));
    }
}
