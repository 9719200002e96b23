use serde::{Deserialize, Serialize};

use crate::sample::CategorySet;

pub const DEFAULT_RIG_NAME: &str = "Human3.6M";

fn default_rig_name() -> String {
    DEFAULT_RIG_NAME.to_string()
}

/// Conversion settings shared by every trial of a run. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Rig (key in the rig document) used to aggregate markers into joints.
    #[serde(default = "default_rig_name", alias = "rig")]
    pub rig_name: String,
    #[serde(default)]
    pub categories: CategorySet,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            rig_name: default_rig_name(),
            categories: CategorySet::default(),
        }
    }
}
