//! Backend endpoints and limits, read from a RON file and overridden by flags.
//!
//! Every field is optional in the file; missing ones keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use askpanel_engine::BackendSettings;
use panel_logging::panel_info;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "askpanel.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub image_qa_url: String,
    pub recommender_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = BackendSettings::default();
        Self {
            image_qa_url: settings.image_qa_url,
            recommender_url: settings.recommender_url,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_response_bytes: settings.max_response_bytes,
        }
    }
}

impl AppConfig {
    pub fn apply_overrides(
        &mut self,
        image_qa_url: Option<String>,
        recommender_url: Option<String>,
    ) {
        if let Some(url) = image_qa_url {
            self.image_qa_url = url;
        }
        if let Some(url) = recommender_url {
            self.recommender_url = url;
        }
    }

    /// Names the first limit that would make every call fail.
    fn zero_limit(&self) -> Option<&'static str> {
        [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
            ("max_response_bytes", self.max_response_bytes),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0)
        .map(|(name, _)| name)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            image_qa_url: self.image_qa_url.clone(),
            recommender_url: self.recommender_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Loads `explicit` if given (it must exist), otherwise `./askpanel.ron` if
/// present, otherwise defaults.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                read(path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn read(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    if let Some(field) = config.zero_limit() {
        return Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("{field} must be greater than zero"),
        });
    }
    panel_info!("Loaded config from {:?}", path);
    Ok(config)
}
