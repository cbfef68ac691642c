//! Global caldesk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NOTIFICATION_TITLE, DEFAULT_SCAN_INTERVAL_SECS};
use crate::error::{CalDeskError, CalDeskResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/caldesk";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_scan_interval_secs() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

fn default_notification_title() -> String {
    DEFAULT_NOTIFICATION_TITLE.to_string()
}

/// Configuration at ~/.config/caldesk/config.toml, overridable with
/// `CALDESK_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalDeskConfig {
    /// Where accounts, the session and per-user event stores are kept.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    #[serde(default = "default_notification_title")]
    pub notification_title: String,
}

impl Default for CalDeskConfig {
    fn default() -> Self {
        CalDeskConfig {
            data_dir: default_data_dir(),
            scan_interval_secs: default_scan_interval_secs(),
            notification_title: default_notification_title(),
        }
    }
}

impl CalDeskConfig {
    pub fn config_path() -> CalDeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalDeskError::Config("Could not determine config directory".into()))?
            .join("caldesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if
    /// no config file exists yet.
    pub fn load() -> CalDeskResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalDeskResult<Self> {
        let config: CalDeskConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("CALDESK"))
            .build()
            .map_err(|e| CalDeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalDeskError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CalDeskResult<()> {
        if self.scan_interval_secs == 0 {
            return Err(CalDeskError::Config(
                "scan_interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalDeskResult<()> {
        let contents = format!(
            "\
# caldesk configuration

# Where accounts and events are stored:
# data_dir = \"{}\"

# Seconds between reminder checks:
# scan_interval_secs = {}

# Heading of reminder notifications:
# notification_title = \"{}\"
",
            DEFAULT_DATA_DIR, DEFAULT_SCAN_INTERVAL_SECS, DEFAULT_NOTIFICATION_TITLE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalDeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalDeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
