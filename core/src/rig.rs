use log::debug;
use ndarray::{s, Array3, Axis};
use serde_json::{Map as JsonMap, Value};
use serde_path_to_error as spte;

use crate::error::ConvertError;
use crate::extraction::{MarkerIndex, RawPose};

/// One skeletal joint and the raw markers averaged into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointMapping {
    pub joint: String,
    pub markers: Vec<String>,
}

/// Named joint → marker-group mapping. Joint order is document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigDefinition {
    name: String,
    joints: Vec<JointMapping>,
}

impl RigDefinition {
    pub fn new<J, M>(name: impl Into<String>, joints: J) -> Self
    where
        J: IntoIterator<Item = (String, M)>,
        M: IntoIterator<Item = String>,
    {
        Self {
            name: name.into(),
            joints: joints
                .into_iter()
                .map(|(joint, markers)| JointMapping {
                    joint,
                    markers: markers.into_iter().collect(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joints(&self) -> &[JointMapping] {
        &self.joints
    }

    pub fn joint_names(&self) -> Vec<String> {
        self.joints.iter().map(|j| j.joint.clone()).collect()
    }

    fn from_value(name: &str, value: &Value) -> Result<Self, ConvertError> {
        let obj = value.as_object().ok_or_else(|| {
            ConvertError::MalformedInput(format!("rig '{name}' is not an object of joints"))
        })?;

        let mut joints = Vec::with_capacity(obj.len());
        for (joint, markers) in obj {
            let markers: Vec<String> = spte::deserialize(markers).map_err(|e| {
                ConvertError::MalformedInput(format!(
                    "rig '{name}' joint '{joint}': {}",
                    e.inner()
                ))
            })?;
            joints.push(JointMapping {
                joint: joint.clone(),
                markers,
            });
        }
        Ok(Self {
            name: name.to_string(),
            joints,
        })
    }

    /// Column indices per joint. Unknown names and empty groups are errors.
    pub fn resolve(&self, index: &MarkerIndex<'_>) -> Result<Vec<Vec<usize>>, ConvertError> {
        self.joints
            .iter()
            .map(|j| {
                if j.markers.is_empty() {
                    return Err(ConvertError::EmptyJoint {
                        joint: j.joint.clone(),
                    });
                }
                j.markers
                    .iter()
                    .map(|m| {
                        index.get(m).ok_or_else(|| ConvertError::UnresolvedMarker {
                            joint: j.joint.clone(),
                            marker: m.clone(),
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Every rig of a rig document, keyed by rig name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigBook {
    rigs: Vec<RigDefinition>,
}

impl RigBook {
    pub fn new(rigs: Vec<RigDefinition>) -> Self {
        Self { rigs }
    }

    pub fn from_json_str(json_in: &str) -> Result<Self, ConvertError> {
        let mut de = serde_json::Deserializer::from_str(json_in);
        let doc: JsonMap<String, Value> = spte::deserialize(&mut de)?;
        de.end()
            .map_err(|e| ConvertError::MalformedInput(format!("trailing data: {e}")))?;

        let rigs = doc
            .iter()
            .map(|(name, v)| RigDefinition::from_value(name, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rigs })
    }

    pub fn get(&self, name: &str) -> Result<&RigDefinition, ConvertError> {
        self.rigs
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ConvertError::UnknownRig {
                rig: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.rigs.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Joint positions after marker averaging, shape (frames, joints, 3).
#[derive(Debug, Clone, PartialEq)]
pub struct RigPose {
    pub positions: Array3<f64>,
    pub joints: Vec<String>,
}

impl RigPose {
    pub fn frames(&self) -> usize {
        self.positions.len_of(Axis(0))
    }
}

/// Unweighted per-frame, per-axis mean of each joint's marker group.
///
/// No smoothing, interpolation or outlier rejection.
pub fn aggregate(raw: &RawPose, rig: &RigDefinition) -> Result<RigPose, ConvertError> {
    let index = raw.marker_index();
    let groups = rig.resolve(&index)?;

    let mut positions = Array3::<f64>::zeros((raw.frames(), groups.len(), 3));
    for (j, cols) in groups.iter().enumerate() {
        let mean = raw
            .positions
            .select(Axis(1), cols)
            .mean_axis(Axis(1))
            .ok_or_else(|| ConvertError::EmptyJoint {
                joint: rig.joints[j].joint.clone(),
            })?;
        positions.slice_mut(s![.., j, ..]).assign(&mean);
    }

    debug!(
        "rig '{}': {} markers -> {} joints over {} frames",
        rig.name,
        raw.marker_count(),
        groups.len(),
        raw.frames()
    );

    Ok(RigPose {
        positions,
        joints: rig.joint_names(),
    })
}
