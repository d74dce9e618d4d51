//! Daybook configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::month::WeekStart;
use crate::persist::{DEFAULT_STORAGE_NAME, FileStorage};

static DEFAULT_DATA_DIR: &str = "~/.local/share/daybook";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_storage_name() -> String {
    DEFAULT_STORAGE_NAME.to_string()
}

/// Configuration at ~/.config/daybook/config.toml
///
/// Every key can be overridden from the environment with a `DAYBOOK_`
/// prefix, e.g. `DAYBOOK_DATA_DIR`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DaybookConfig {
    /// Where the event snapshot lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the storage entry (file stem of the snapshot)
    #[serde(default = "default_storage_name")]
    pub storage_name: String,

    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            data_dir: default_data_dir(),
            storage_name: default_storage_name(),
            week_start: WeekStart::default(),
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file on
    /// first run.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        debug!(path = %path.display(), "loading config");

        let config: DaybookConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("DAYBOOK"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_path(), &self.storage_name)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ConfigResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where your events are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Name of the storage file inside data_dir (without .json):
# storage_name = \"{DEFAULT_STORAGE_NAME}\"

# First column of the month grid (\"sunday\" or \"monday\"):
# week_start = \"sunday\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}
