use serde_path_to_error as spte;
use thiserror::Error;

/// Everything that can reject a single trial.
///
/// None of these are transient: the same input always fails the same way, so
/// callers should report and move on rather than retry.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("incompatible temporal alignment: common window [{start}, {end}) is empty or negative")]
    Alignment { start: i64, end: i64 },

    #[error("unknown marker in rig mapping: joint '{joint}' references missing marker '{marker}'")]
    UnresolvedMarker { joint: String, marker: String },

    #[error("joint '{joint}' maps to no markers; cannot average an empty group")]
    EmptyJoint { joint: String },

    #[error("unknown rig '{rig}'")]
    UnknownRig { rig: String },

    #[error("unknown category '{category}'")]
    UnknownCategory { category: String },

    #[error("marker '{marker}' yields {got} samples for the common window, expected {expected}")]
    SampleCountMismatch {
        marker: String,
        expected: usize,
        got: usize,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Short stable label, used as the metrics `outcome`.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Alignment { .. } => "alignment",
            ConvertError::UnresolvedMarker { .. } => "unresolved_marker",
            ConvertError::EmptyJoint { .. } => "empty_joint",
            ConvertError::UnknownRig { .. } => "unknown_rig",
            ConvertError::UnknownCategory { .. } => "unknown_category",
            ConvertError::SampleCountMismatch { .. } => "sample_count_mismatch",
            ConvertError::MalformedInput(_) => "malformed_input",
            ConvertError::Export(_) => "export",
            ConvertError::Io(_) => "io",
        }
    }
}

impl From<spte::Error<serde_json::Error>> for ConvertError {
    fn from(e: spte::Error<serde_json::Error>) -> Self {
        ConvertError::MalformedInput(format!("parse error at {}: {}", e.path(), e.inner()))
    }
}

/// A [`ConvertError`] tagged with the trial it came from.
#[derive(Debug, Error)]
#[error("trial '{trial_id}': {source}")]
pub struct TrialError {
    pub trial_id: String,
    pub source: ConvertError,
}

impl TrialError {
    pub fn new(trial_id: impl Into<String>, source: ConvertError) -> Self {
        Self {
            trial_id: trial_id.into(),
            source,
        }
    }
}
