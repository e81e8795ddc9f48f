use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the markdown pages.
    pub notes_path: PathBuf,
    /// Line count above which section folding is disabled.
    #[serde(default = "default_fold_scan_limit")]
    pub fold_scan_limit: usize,
    /// Where per-page fold state lives. Defaults next to the notes.
    #[serde(default)]
    pub fold_state_dir: Option<PathBuf>,
}

fn default_fold_scan_limit() -> usize {
    10_000
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.notes_path = expand_path(&config.notes_path).unwrap_or(config.notes_path);
        config.fold_state_dir = config
            .fold_state_dir
            .map(|dir| expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/linemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The effective fold-state directory: explicit setting or a dot
    /// directory inside the notes path.
    pub fn fold_state_dir(&self) -> PathBuf {
        self.fold_state_dir
            .clone()
            .unwrap_or_else(|| self.notes_path.join(".linemark").join("folds"))
    }
}

fn expand_path(path: &Path) -> Option<PathBuf> {
    let path_str = path.to_string_lossy();
    match shellexpand::full(&path_str) {
        Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
        Err(_) => None,
    }
}
