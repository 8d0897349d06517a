use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Hosted repository used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://pyq-backend-yzz5.onrender.com";

/// Environment variable that overrides the configured backend.
pub const BACKEND_URL_ENV: &str = "PYQ_BACKEND_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the paper repository, without a trailing slash.
    pub backend_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl Config {
    /// `config.toml` in the platform config directory, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pyq").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load defaults, then the config file, then the environment.
    ///
    /// Returns the config together with the file path that was consulted.
    pub fn load(explicit: Option<&str>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_with_env(explicit, std::env::var(BACKEND_URL_ENV).ok())
    }

    fn load_with_env(
        explicit: Option<&str>,
        env_url: Option<String>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(p) => Some(PathBuf::from(shellexpand::tilde(p).to_string())),
            None => Self::default_path(),
        };

        let mut config = match &path {
            Some(p) => Self::load_from(p)?,
            None => Self::default(),
        };

        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            debug!("{BACKEND_URL_ENV} set, overriding backend url");
            config.backend_url = url;
        }

        config.normalize();
        Ok((config, path))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self.normalize();
        self
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    fn normalize(&mut self) {
        let trimmed = self.backend_url.trim().trim_end_matches('/');
        self.backend_url = if trimmed.is_empty() {
            DEFAULT_BACKEND_URL.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn file_value_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = \"http://localhost:8080/\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend_url(), "http://localhost:8080");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = \"http://file.example\"\n").unwrap();
        let explicit = path.to_str().unwrap();

        let (config, used) =
            Config::load_with_env(Some(explicit), Some("http://env.example/".into())).unwrap();
        assert_eq!(config.backend_url(), "http://env.example");
        assert_eq!(used.as_deref(), Some(path.as_path()));

        let (config, _) = Config::load_with_env(Some(explicit), Some("  ".into())).unwrap();
        assert_eq!(config.backend_url(), "http://file.example");
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        let config = Config::default().with_backend_url("   ");
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn renders_as_toml() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains(DEFAULT_BACKEND_URL));
    }
}
