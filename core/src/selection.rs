use crate::error::ConvertError;
use crate::types::Segment;

/// Zero-indexed, half-open global frame range of a marker's chosen segment.
///
/// Built from the recorded 1-indexed inclusive bounds as
/// `[start - 1, end - 1)`, so the last recorded frame falls outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthoritativeWindow {
    pub start: i64,
    pub end: i64,
}

impl AuthoritativeWindow {
    #[inline]
    pub fn len(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// Result of picking the authoritative segment of one marker.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub index: usize,
    pub window: AuthoritativeWindow,
    pub segment: &'a Segment,
}

/// Picks the longest segment (by `end - start`). Ties go to the earliest one.
pub fn select_segment(segments: &[Segment]) -> Result<Selection<'_>, ConvertError> {
    let mut best: Option<(usize, i64)> = None;
    for (i, seg) in segments.iter().enumerate() {
        let d = seg.range.duration();
        match best {
            // strict '>' keeps the first maximum
            Some((_, best_d)) if d <= best_d => {}
            _ => best = Some((i, d)),
        }
    }

    let (index, _) = best.ok_or_else(|| {
        ConvertError::MalformedInput("cannot select a segment from an empty list".into())
    })?;
    let segment = &segments[index];

    Ok(Selection {
        index,
        window: AuthoritativeWindow {
            start: segment.range.start.saturating_sub(1),
            end: segment.range.end.saturating_sub(1),
        },
        segment,
    })
}
