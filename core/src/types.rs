use serde::Deserialize;
use serde_path_to_error as spte;

use crate::error::ConvertError;

/// One 3D position sample (x, y, z).
pub type Point3 = [f64; 3];

/// 1-indexed, inclusive frame bounds as written by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameRange {
    #[serde(alias = "Start")]
    pub start: i64,
    #[serde(alias = "End")]
    pub end: i64,
}

/// Largest accepted magnitude of a recorded frame bound.
pub const MAX_FRAME_BOUND: i64 = 1 << 40;

impl FrameRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// `end - start` on the raw bounds. Only used for comparing segments.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Number of recorded frames (inclusive bounds).
    #[inline]
    pub fn frame_count(&self) -> i64 {
        self.duration().saturating_add(1)
    }

    /// Rejects inverted ranges and bounds outside `±MAX_FRAME_BOUND`.
    pub fn check(&self) -> Result<(), String> {
        if self.start.abs() > MAX_FRAME_BOUND || self.end.abs() > MAX_FRAME_BOUND {
            return Err(format!(
                "range [{}, {}] exceeds frame bound {MAX_FRAME_BOUND}",
                self.start, self.end
            ));
        }
        if self.end < self.start {
            return Err(format!(
                "range [{}, {}] ends before it starts",
                self.start, self.end
            ));
        }
        Ok(())
    }
}

/// One recorded take of a marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SegmentIn")]
pub struct Segment {
    pub range: FrameRange,
    pub values: Vec<Point3>,
}

impl Segment {
    pub fn new(start: i64, end: i64, values: Vec<Point3>) -> Self {
        Self {
            range: FrameRange::new(start, end),
            values,
        }
    }
}

/// A named tracking point with one or more recorded segments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Marker {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Parts", alias = "parts")]
    pub segments: Vec<Segment>,
}

impl Marker {
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }
}

/// One recording. Marker order defines column order downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trial {
    #[serde(alias = "Markers")]
    pub markers: Vec<Marker>,
}

impl Trial {
    pub fn new(markers: Vec<Marker>) -> Result<Self, ConvertError> {
        let trial = Self { markers };
        trial.validate()?;
        Ok(trial)
    }

    /// Parses a trial document. Errors name the JSON path of the first bad field.
    pub fn from_json_str(json_in: &str) -> Result<Self, ConvertError> {
        let mut de = serde_json::Deserializer::from_str(json_in);
        let trial: Trial = spte::deserialize(&mut de)?;
        de.end()
            .map_err(|e| ConvertError::MalformedInput(format!("trailing data: {e}")))?;
        trial.validate()?;
        Ok(trial)
    }

    pub fn marker_names(&self) -> Vec<String> {
        self.markers.iter().map(|m| m.name.clone()).collect()
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.markers.is_empty() {
            return Err(ConvertError::MalformedInput("trial has no markers".into()));
        }
        for m in &self.markers {
            if m.segments.is_empty() {
                return Err(ConvertError::MalformedInput(format!(
                    "marker '{}' has no segments",
                    m.name
                )));
            }
            for (i, seg) in m.segments.iter().enumerate() {
                seg.range.check().map_err(|e| {
                    ConvertError::MalformedInput(format!("marker '{}' segment {i}: {e}", m.name))
                })?;
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Wire form of a segment: values nested ([[x,y,z,..], ..]) or flat ([x,y,z,x,..])
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SegmentIn {
    #[serde(alias = "Range")]
    range: FrameRange,
    #[serde(alias = "Values")]
    values: ValuesIn,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValuesIn {
    Nested(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

impl TryFrom<SegmentIn> for Segment {
    type Error = String;

    fn try_from(raw: SegmentIn) -> Result<Self, Self::Error> {
        raw.range.check()?;
        let values = match raw.values {
            ValuesIn::Nested(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| match row.as_slice() {
                    [x, y, z, ..] => Ok([*x, *y, *z]),
                    _ => Err(format!(
                        "sample {i} has {} components, expected at least 3",
                        row.len()
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            ValuesIn::Flat(flat) => {
                let frames = raw.range.frame_count();
                if frames <= 0 {
                    return Err(format!(
                        "range [{}, {}] holds no frames",
                        raw.range.start, raw.range.end
                    ));
                }
                let frames = frames as usize;
                if flat.len() % frames != 0 || flat.len() / frames < 3 {
                    return Err(format!(
                        "flat values of length {} do not split into {frames} samples of at least 3 components",
                        flat.len()
                    ));
                }
                let stride = flat.len() / frames;
                flat.chunks_exact(stride)
                    .map(|c| [c[0], c[1], c[2]])
                    .collect()
            }
        };

        Ok(Segment {
            range: raw.range,
            values,
        })
    }
}
