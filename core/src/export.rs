use std::path::{Path, PathBuf};

use log::info;
use ndarray_npy::write_npy;

use crate::error::ConvertError;
use crate::sample::Sample;

/// Writes `<trial_id>.npy` into `features_dir` (f64, (frames, joints*3)) and
/// `labels_dir` (i64, (frames,)). Directories are created if missing.
pub fn write_sample(
    sample: &Sample,
    features_dir: &Path,
    labels_dir: &Path,
) -> Result<(PathBuf, PathBuf), ConvertError> {
    std::fs::create_dir_all(features_dir)?;
    std::fs::create_dir_all(labels_dir)?;

    let file_name = format!("{}.npy", sample.trial_id);
    let features_path = features_dir.join(&file_name);
    let labels_path = labels_dir.join(&file_name);

    write_npy(&features_path, &sample.features)
        .map_err(|e| ConvertError::Export(format!("{}: {e}", features_path.display())))?;
    write_npy(&labels_path, &sample.labels)
        .map_err(|e| ConvertError::Export(format!("{}: {e}", labels_path.display())))?;

    info!(
        "wrote {} ({} frames)",
        features_path.display(),
        sample.frames()
    );
    Ok((features_path, labels_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use ndarray_npy::read_npy;

    #[test]
    fn writes_features_and_labels_side_by_side() {
        let root = std::env::temp_dir().join("fsjump_core_export_test");
        let _ = std::fs::remove_dir_all(&root);

        let sample = Sample {
            trial_id: "Axel_01".into(),
            category: "Axel".into(),
            label: 2,
            joints: vec!["Pelvis".into()],
            features: Array2::from_shape_fn((4, 3), |(f, a)| (f * 3 + a) as f64),
            labels: Array1::from_elem(4, 2),
        };

        let (fp, lp) = write_sample(&sample, &root.join("features"), &root.join("labels")).unwrap();
        assert_eq!(fp.file_name().unwrap(), "Axel_01.npy");

        let features: Array2<f64> = read_npy(&fp).unwrap();
        let labels: Array1<i64> = read_npy(&lp).unwrap();
        assert_eq!(features, sample.features);
        assert_eq!(labels.to_vec(), vec![2, 2, 2, 2]);

        std::fs::remove_dir_all(&root).ok();
    }
}
