use log::warn;
use ndarray::{s, Array1, Array2, Axis};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ConvertError;
use crate::rig::RigPose;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub code: i64,
}

/// Closed, ordered enumeration of trial categories and their label codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    categories: Vec<Category>,
}

/// Figure-skating jump classes.
static FS_JUMP_CATEGORIES: Lazy<CategorySet> = Lazy::new(|| {
    CategorySet::new([
        ("Lutz", 0),
        ("Loop", 1),
        ("Axel", 2),
        ("Comb", 3),
        ("Flip", 4),
        ("Salchow", 5),
        ("Toeloop", 6),
    ])
});

impl CategorySet {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, code)| Category {
                    name: name.into(),
                    code,
                })
                .collect(),
        }
    }

    pub fn fs_jump() -> Self {
        FS_JUMP_CATEGORIES.clone()
    }

    /// Label code for `name` (exact match, first entry wins).
    pub fn code(&self, name: &str) -> Option<i64> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.code)
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::fs_jump()
    }
}

/// Training sample for one trial.
///
/// `features` is (frames, joints * 3) laid out joint-major per frame
/// (`[j0.x, j0.y, j0.z, j1.x, ..]`); `labels` repeats `label` once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub trial_id: String,
    pub category: String,
    pub label: i64,
    pub joints: Vec<String>,
    pub features: Array2<f64>,
    pub labels: Array1<i64>,
}

impl Sample {
    pub fn frames(&self) -> usize {
        self.features.len_of(Axis(0))
    }

    pub fn to_json_value(&self) -> Value {
        let features: Vec<Vec<f64>> = self.features.rows().into_iter().map(|r| r.to_vec()).collect();
        json!({
            "trial_id": self.trial_id,
            "category": self.category,
            "label": self.label,
            "joints": self.joints,
            "frames": self.frames(),
            "features": features,
            "labels": self.labels.to_vec(),
        })
    }
}

/// Flattens a rig pose into per-frame features and attaches per-frame labels.
///
/// LENIENT STEP: if feature and label lengths ever disagree, both are
/// truncated to the shorter length with a warning instead of failing. This
/// hides upstream off-by-one bugs; every other stage fails hard.
pub fn build_sample(
    trial_id: &str,
    pose: RigPose,
    category: &str,
    categories: &CategorySet,
) -> Result<Sample, ConvertError> {
    let label = categories
        .code(category)
        .ok_or_else(|| ConvertError::UnknownCategory {
            category: category.to_string(),
        })?;

    let (frames, joints, _) = pose.positions.dim();
    let features = pose
        .positions
        .as_standard_layout()
        .into_owned()
        .into_shape((frames, joints * 3))
        .map_err(|e| ConvertError::MalformedInput(format!("cannot flatten rig pose: {e}")))?;
    let labels = Array1::from_elem(frames, label);

    let (features, labels) = reconcile_lengths(trial_id, features, labels);

    Ok(Sample {
        trial_id: trial_id.to_string(),
        category: category.to_string(),
        label,
        joints: pose.joints,
        features,
        labels,
    })
}

/// Truncates both arrays to their common length.
pub(crate) fn reconcile_lengths(
    trial_id: &str,
    features: Array2<f64>,
    labels: Array1<i64>,
) -> (Array2<f64>, Array1<i64>) {
    let n_feat = features.len_of(Axis(0));
    let n_lab = labels.len();
    if n_feat == n_lab {
        return (features, labels);
    }

    let t = n_feat.min(n_lab);
    warn!(
        "trial '{}': {} feature frames vs {} labels, truncating both to {}",
        trial_id, n_feat, n_lab, t
    );
    (
        features.slice(s![..t, ..]).to_owned(),
        labels.slice(s![..t]).to_owned(),
    )
}
