use log::debug;

use crate::error::ConvertError;
use crate::selection::{select_segment, AuthoritativeWindow};
use crate::types::Trial;

/// Global frame range `[start, end)` covered by every marker of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonWindow {
    pub start: i64,
    pub end: i64,
}

impl CommonWindow {
    /// Frame count. Only meaningful for windows returned by [`common_window`].
    #[inline]
    pub fn frames(&self) -> usize {
        self.end.saturating_sub(self.start).max(0) as usize
    }
}

/// Intersects the per-marker windows: `[max(starts), min(ends))`.
///
/// An empty, inverted or negative result rejects the trial as a whole.
pub fn common_window(windows: &[AuthoritativeWindow]) -> Result<CommonWindow, ConvertError> {
    let first = windows.first().ok_or_else(|| {
        ConvertError::MalformedInput("cannot align a trial without markers".into())
    })?;

    let (start, end) = windows[1..]
        .iter()
        .fold((first.start, first.end), |(s, e), w| (s.max(w.start), e.min(w.end)));

    if start >= end || start < 0 || end < 0 {
        return Err(ConvertError::Alignment { start, end });
    }
    Ok(CommonWindow { start, end })
}

/// Authoritative windows of every marker, in marker order.
pub fn marker_windows(trial: &Trial) -> Result<Vec<AuthoritativeWindow>, ConvertError> {
    trial
        .markers
        .iter()
        .map(|m| select_segment(&m.segments).map(|s| s.window))
        .collect()
}

/// Segment selection + alignment for a whole trial.
pub fn align_trial(trial: &Trial) -> Result<CommonWindow, ConvertError> {
    let windows = marker_windows(trial)?;
    let common = common_window(&windows)?;
    debug!(
        "aligned {} markers to frames [{}, {}) ({} frames)",
        windows.len(),
        common.start,
        common.end,
        common.frames()
    );
    Ok(common)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(start: i64, end: i64) -> AuthoritativeWindow {
        AuthoritativeWindow { start, end }
    }

    #[test]
    fn takes_latest_start_and_earliest_end() {
        let c = common_window(&[w(0, 9), w(2, 7), w(1, 8)]).unwrap();
        assert_eq!(c, CommonWindow { start: 2, end: 7 });
        assert_eq!(c.frames(), 5);
    }

    #[test]
    fn single_marker_keeps_its_window() {
        let c = common_window(&[w(4, 12)]).unwrap();
        assert_eq!(c, CommonWindow { start: 4, end: 12 });
    }

    #[test]
    fn disjoint_windows_fail() {
        let err = common_window(&[w(0, 5), w(10, 20)]).unwrap_err();
        assert!(matches!(err, ConvertError::Alignment { start: 10, end: 5 }));
    }

    #[test]
    fn touching_windows_are_empty_and_fail() {
        assert!(matches!(
            common_window(&[w(0, 5), w(5, 9)]),
            Err(ConvertError::Alignment { start: 5, end: 5 })
        ));
    }

    #[test]
    fn negative_bounds_fail() {
        // a segment starting at recorded frame 0 maps to -1
        assert!(matches!(
            common_window(&[w(-1, 4)]),
            Err(ConvertError::Alignment { .. })
        ));
    }

    #[test]
    fn no_windows_is_malformed() {
        assert!(matches!(
            common_window(&[]),
            Err(ConvertError::MalformedInput(_))
        ));
    }
}
