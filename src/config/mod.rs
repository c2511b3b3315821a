use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What `show_progress` does while a progress dialog is already open
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressOverlap {
    /// Close the open dialog, then open the new one
    #[default]
    Replace,
    /// Refuse with `DialogError::ProgressAlreadyActive`
    Reject,
}

impl std::str::FromStr for ProgressOverlap {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "reject" => Ok(Self::Reject),
            other => Err(anyhow::anyhow!("unknown progress overlap policy '{}'", other)),
        }
    }
}

/// Dialog manager configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Policy for overlapping progress dialogs
    pub progress_overlap: ProgressOverlap,

    /// Log a warning when a custom dialog has no registered template
    pub warn_on_missing_template: bool,

    /// Filter used by callers that do not supply one
    pub default_filter: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            progress_overlap: ProgressOverlap::Replace,
            warn_on_missing_template: true,
            default_filter: "All files (*.*)|*.*".to_string(),
        }
    }
}

impl ManagerConfig {
    /// Initialize configuration from the environment and config files
    pub async fn init() -> Result<Self> {
        debug!("Initializing dialog manager configuration");

        let mut config = Self::default();

        match Self::load_from_file().await {
            Ok(Some(file_config)) => config = file_config,
            Ok(None) => debug!("No configuration file found, using defaults"),
            Err(e) => warn!("Ignoring malformed configuration file: {}", e),
        }

        // Environment overrides files
        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(policy) = std::env::var("DIALOG_MANAGER_PROGRESS_OVERLAP") {
            match policy.parse() {
                Ok(policy) => self.progress_overlap = policy,
                Err(e) => debug!("Ignoring DIALOG_MANAGER_PROGRESS_OVERLAP: {}", e),
            }
        }

        if let Ok(value) = std::env::var("DIALOG_MANAGER_WARN_MISSING_TEMPLATE") {
            match parse_flag(&value) {
                Some(flag) => self.warn_on_missing_template = flag,
                None => warn!(
                    "Ignoring DIALOG_MANAGER_WARN_MISSING_TEMPLATE: '{}' is not a boolean",
                    value
                ),
            }
        }

        if let Ok(filter) = std::env::var("DIALOG_MANAGER_DEFAULT_FILTER") {
            self.default_filter = filter;
        }
    }

    /// Candidate config files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.dialog-manager.json"),
            PathBuf::from("./dialog-manager.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dialog-manager").join("config.json"));
        }

        paths
    }

    /// Load configuration from the first config file found.
    ///
    /// `Ok(None)` when there is no file; an unreadable or malformed file is
    /// an error.
    pub async fn load_from_file() -> Result<Option<Self>> {
        Self::load_first(&Self::config_paths()).await
    }

    async fn load_first(paths: &[PathBuf]) -> Result<Option<Self>> {
        for path in paths {
            if path.exists() {
                return Self::load_from_path(path).await.map(Some);
            }
        }

        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_filter.trim().is_empty() {
            return Err(anyhow::anyhow!("default_filter must not be empty"));
        }

        Ok(())
    }
}

/// Boolean environment values, case-insensitive
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
