//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        if let Some(dir) = config.logging.directory.take() {
            let expanded = Self::expand_path(&dir.to_string_lossy());
            config.logging.directory = Some(PathBuf::from(expanded));
        }
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the default location.
    /// A missing default file yields the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    /// `<user config dir>/proofmark/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("proofmark").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.local/state`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.overlay.min_words, 2);
    }

    #[test]
    fn test_load_provider_section() {
        let content = r#"
            [provider]
            endpoint = "https://corrections.internal/v1/chat"
            model = "grammar-small"
            readiness_url = "https://corrections.internal/health"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.provider.endpoint, "https://corrections.internal/v1/chat");
        assert_eq!(config.provider.model, "grammar-small");
        assert_eq!(
            config.provider.readiness_url.as_deref(),
            Some("https://corrections.internal/health")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[overlay]").unwrap();
        writeln!(file, "reset_delay_ms = 900").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.overlay.reset_delay_ms, 900);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_explicit_missing_path() {
        let result = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/proofmark.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PROOFMARK_TEST_KEY", "sk-test");
        }
        let config = ConfigLoader::load_str(
            r#"
            [provider]
            api_key = "${PROOFMARK_TEST_KEY}"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        unsafe {
            std::env::remove_var("PROOFMARK_TEST_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_PROOFMARK_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_logging_directory_tilde_expanded() {
        let config = ConfigLoader::load_str(
            r#"
            [logging]
            directory = "~/proofmark-logs"
            "#,
        )
        .unwrap();
        let dir = config.logging.directory.unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("proofmark-logs"));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = ConfigLoader::default_path() {
            assert!(path.ends_with("proofmark/config.toml"));
        }
    }
}
