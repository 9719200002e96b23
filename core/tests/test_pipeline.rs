use fsjump_core::{
    convert_trial, CategorySet, ConvertError, Marker, RigBook, RigDefinition, Segment, Trial,
};
use serde_json::json;

/// Marker with one segment whose sample at global (0-indexed) frame g is `f(g)`.
fn marker(name: &str, start: i64, end: i64, f: impl Fn(f64) -> [f64; 3]) -> Marker {
    let values = (start..=end).map(|fr| f((fr - 1) as f64)).collect();
    Marker::new(name, vec![Segment::new(start, end, values)])
}

fn rig(name: &str, joints: &[(&str, &[&str])]) -> RigDefinition {
    RigDefinition::new(
        name,
        joints
            .iter()
            .map(|(j, ms)| (j.to_string(), ms.iter().map(|m| m.to_string()).collect::<Vec<_>>())),
    )
}

#[test]
fn two_marker_trial_end_to_end() {
    // A: [1,10] -> window [0,9); B: [3,8] -> window [2,7); common [2,7) = 5 frames
    let trial = Trial::new(vec![
        marker("A", 1, 10, |g| [g, 0.0, 10.0]),
        marker("B", 3, 8, |g| [g + 2.0, 4.0, -10.0]),
    ])
    .unwrap();
    let rig = rig("pair", &[("joint1", &["A", "B"])]);

    let sample = convert_trial(&trial, &rig, "take_01", "Axel", &CategorySet::fs_jump()).unwrap();

    assert_eq!(sample.features.dim(), (5, 3));
    assert_eq!(sample.labels.to_vec(), vec![2; 5]);
    for (i, row) in sample.features.rows().into_iter().enumerate() {
        let g = (i + 2) as f64;
        assert!((row[0] - (g + 1.0)).abs() < 1e-12, "x at frame {i}");
        assert!((row[1] - 2.0).abs() < 1e-12);
        assert!(row[2].abs() < 1e-12);
    }
}

#[test]
fn single_marker_joints_are_identity() {
    let trial = Trial::new(vec![
        marker("LFHD", 1, 6, |g| [g, g * 2.0, g * 3.0]),
        marker("RFHD", 1, 6, |g| [-g, 1.0, 2.0]),
    ])
    .unwrap();
    let rig = rig("ident", &[("right", &["RFHD"]), ("left", &["LFHD"])]);

    let s = convert_trial(&trial, &rig, "t", "Loop", &CategorySet::fs_jump()).unwrap();

    assert_eq!(s.joints, vec!["right", "left"]);
    assert_eq!(s.features.dim(), (5, 6));
    let row = s.features.row(3);
    assert_eq!(row.to_vec(), vec![-3.0, 1.0, 2.0, 3.0, 6.0, 9.0]);
}

#[test]
fn constant_markers_average_to_midpoint() {
    let trial = Trial::new(vec![
        marker("L", 1, 20, |_| [0.0, 0.0, 0.0]),
        marker("R", 1, 20, |_| [2.0, 2.0, 2.0]),
    ])
    .unwrap();
    let rig = rig("mid", &[("hip", &["L", "R"])]);

    let s = convert_trial(&trial, &rig, "t", "Lutz", &CategorySet::fs_jump()).unwrap();
    assert!(s.features.iter().all(|v| (*v - 1.0).abs() < 1e-12));
}

#[test]
fn longest_segment_wins_per_marker() {
    // A has a short early take and a long one; only the long one counts
    let a = Marker::new(
        "A",
        vec![
            Segment::new(1, 3, vec![[99.0; 3]; 3]),
            Segment::new(5, 14, (0..10).map(|i| [i as f64; 3]).collect()),
        ],
    );
    let b = marker("B", 1, 20, |_| [0.0; 3]);
    let trial = Trial::new(vec![a, b]).unwrap();
    let rig = rig("a", &[("a", &["A"])]);

    let s = convert_trial(&trial, &rig, "t", "Flip", &CategorySet::fs_jump()).unwrap();
    assert_eq!(s.frames(), 9);
    assert_eq!(s.features[[0, 0]], 0.0);
    assert!(s.features.iter().all(|v| *v != 99.0));
}

#[test]
fn non_overlapping_markers_fail_alignment() {
    let trial = Trial::new(vec![
        marker("A", 1, 5, |_| [0.0; 3]),
        marker("B", 10, 20, |_| [0.0; 3]),
    ])
    .unwrap();
    let rig = rig("r", &[("j", &["A"])]);

    let err = convert_trial(&trial, &rig, "t", "Axel", &CategorySet::fs_jump()).unwrap_err();
    assert!(matches!(err, ConvertError::Alignment { start: 9, end: 4 }));
}

#[test]
fn unknown_marker_in_rig_is_reported_not_dropped() {
    let trial = Trial::new(vec![marker("A", 1, 5, |_| [0.0; 3])]).unwrap();
    let rig = rig("r", &[("head", &["A"]), ("toe", &["RTOE"])]);

    match convert_trial(&trial, &rig, "t", "Axel", &CategorySet::fs_jump()) {
        Err(ConvertError::UnresolvedMarker { joint, marker }) => {
            assert_eq!(joint, "toe");
            assert_eq!(marker, "RTOE");
        }
        other => panic!("expected UnresolvedMarker, got {other:?}"),
    }
}

#[test]
fn unknown_category_is_fatal() {
    let trial = Trial::new(vec![marker("A", 1, 5, |_| [0.0; 3])]).unwrap();
    let rig = rig("r", &[("j", &["A"])]);
    let err = convert_trial(&trial, &rig, "t", "Quad", &CategorySet::fs_jump()).unwrap_err();
    assert!(matches!(err, ConvertError::UnknownCategory { .. }));
}

#[test]
fn recorder_json_through_rig_document() {
    let trial_doc = json!({
        "Markers": [
            {"Name": "LASI", "Parts": [
                {"Range": {"Start": 1, "End": 2}, "Values": [[9.0, 9.0, 9.0], [9.0, 9.0, 9.0]]},
                {"Range": {"Start": 1, "End": 4}, "Values": [
                    [0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0], [2.0, 2.0, 2.0, 1.0], [3.0, 3.0, 3.0, 1.0]
                ]}
            ]},
            {"Name": "RASI", "Parts": [
                {"Range": {"Start": 2, "End": 4}, "Values": [
                    [11.0, 1.0, 1.0], [12.0, 2.0, 2.0], [13.0, 3.0, 3.0]
                ]}
            ]}
        ]
    });
    let rig_doc = json!({
        "Human3.6M": {"Pelvis": ["LASI", "RASI"], "RHip": ["RASI"]},
        "Other": {"X": ["LASI"]}
    });

    let trial = Trial::from_json_str(&trial_doc.to_string()).unwrap();
    let rigs = RigBook::from_json_str(&rig_doc.to_string()).unwrap();
    let rig = rigs.get("Human3.6M").unwrap();

    let s = convert_trial(&trial, rig, "Loop_02", "Loop", &CategorySet::fs_jump()).unwrap();

    // LASI window [0,3), RASI window [1,3) -> common [1,3)
    assert_eq!(s.features.dim(), (2, 6));
    assert_eq!(s.features.row(0).to_vec(), vec![6.0, 1.0, 1.0, 11.0, 1.0, 1.0]);
    assert_eq!(s.features.row(1).to_vec(), vec![7.0, 2.0, 2.0, 12.0, 2.0, 2.0]);
    assert_eq!(s.labels.to_vec(), vec![1, 1]);
}
