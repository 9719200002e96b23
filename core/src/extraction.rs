use std::collections::HashMap;

use log::warn;
use ndarray::{Array3, ArrayView2, Axis};

use crate::alignment::CommonWindow;
use crate::error::ConvertError;
use crate::selection::select_segment;
use crate::types::{Point3, Trial};

/// Raw marker positions aligned to the common window.
///
/// `positions` has shape (frames, markers, 3); column `m` belongs to
/// `marker_names[m]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPose {
    pub positions: Array3<f64>,
    pub marker_names: Vec<String>,
    pub window: CommonWindow,
}

impl RawPose {
    pub fn frames(&self) -> usize {
        self.positions.len_of(Axis(0))
    }

    pub fn marker_count(&self) -> usize {
        self.positions.len_of(Axis(1))
    }

    /// (frames, 3) view of one marker column.
    pub fn marker(&self, column: usize) -> ArrayView2<'_, f64> {
        self.positions.index_axis(Axis(1), column)
    }

    pub fn marker_index(&self) -> MarkerIndex<'_> {
        MarkerIndex::new(&self.marker_names)
    }
}

/// Marker name → column lookup, built once per trial.
///
/// Duplicate names resolve to their first occurrence.
#[derive(Debug, Clone)]
pub struct MarkerIndex<'a> {
    columns: HashMap<&'a str, usize>,
}

impl<'a> MarkerIndex<'a> {
    pub fn new(names: &'a [String]) -> Self {
        let mut columns = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            columns.entry(name.as_str()).or_insert(i);
        }
        Self { columns }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }
}

/// Slices every marker's authoritative segment to `window`.
///
/// Global frame `f` lives at local offset `f - marker_window.start` inside the
/// chosen segment's values. Every marker is checked before the tensor is
/// allocated.
pub fn extract_pose(trial: &Trial, window: CommonWindow) -> Result<RawPose, ConvertError> {
    if window.start >= window.end || window.start < 0 {
        return Err(ConvertError::Alignment {
            start: window.start,
            end: window.end,
        });
    }
    let frames = window.frames();

    let mut columns: Vec<&[Point3]> = Vec::with_capacity(trial.markers.len());
    for marker in &trial.markers {
        let sel = select_segment(&marker.segments)?;
        let values = &sel.segment.values;

        let recorded = sel.segment.range.frame_count();
        if i64::try_from(values.len()).map_or(true, |n| n != recorded) {
            warn!(
                "marker '{}': range [{}, {}] spans {} frames but {} samples were recorded",
                marker.name,
                sel.segment.range.start,
                sel.segment.range.end,
                recorded,
                values.len()
            );
        }

        let mismatch = |got: usize| ConvertError::SampleCountMismatch {
            marker: marker.name.clone(),
            expected: frames,
            got,
        };
        // None when the window was not derived from this trial
        let (lo, hi) = match (
            local_offset(window.start, sel.window.start),
            local_offset(window.end, sel.window.start),
        ) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return Err(mismatch(0)),
        };
        let rows = values
            .get(lo..hi)
            .ok_or_else(|| mismatch(values.len().min(hi).saturating_sub(lo)))?;
        columns.push(rows);
    }

    let mut positions = Array3::<f64>::zeros((frames, columns.len(), 3));
    for (m, rows) in columns.iter().enumerate() {
        for (f, p) in rows.iter().enumerate() {
            for (axis, v) in p.iter().enumerate() {
                positions[[f, m, axis]] = *v;
            }
        }
    }

    Ok(RawPose {
        positions,
        marker_names: trial.marker_names(),
        window,
    })
}

#[inline]
fn local_offset(global: i64, segment_start: i64) -> Option<usize> {
    global
        .checked_sub(segment_start)
        .and_then(|o| usize::try_from(o).ok())
}
