use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::rig::RigBook;
use crate::types::Trial;

/// Reads and parses one trial. The file is closed before parsing starts.
pub fn read_trial(path: &Path) -> Result<Trial, ConvertError> {
    let contents = std::fs::read_to_string(path)?;
    Trial::from_json_str(&contents)
}

pub fn read_rig_book(path: &Path) -> Result<RigBook, ConvertError> {
    let contents = std::fs::read_to_string(path)?;
    RigBook::from_json_str(&contents)
}

/// Loads the conversion config (JSON).
/// A missing file yields the default config.
pub fn load_config(path: &Path) -> anyhow::Result<ConvertConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: ConvertConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(
            "config loaded from {} (rig={}, {} categories)",
            path.display(),
            cfg.rig_name,
            cfg.categories.len()
        );
        Ok(cfg)
    } else {
        warn!(
            "no config at {}, using defaults (rig={})",
            path.display(),
            crate::config::DEFAULT_RIG_NAME
        );
        Ok(ConvertConfig::default())
    }
}

/// Writes the config as pretty JSON.
pub fn save_config(cfg: &ConvertConfig, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
    info!("config saved to {}", path.display());
    Ok(())
}

/// Identity of a trial file: `<..>/<category>/<trial_id>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSource {
    pub path: PathBuf,
    pub trial_id: String,
    pub category: String,
}

impl TrialSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let trial_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ConvertError::MalformedInput(format!("no trial name in {}", path.display()))
            })?;
        let category = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConvertError::MalformedInput(format!(
                    "no category directory above {}",
                    path.display()
                ))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            trial_id: trial_id.to_string(),
            category: category.to_string(),
        })
    }
}
