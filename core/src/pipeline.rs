// raw trial -> segment selection -> alignment -> pose extraction
//           -> rig aggregation -> sample
use std::path::Path;

use log::{debug, info, warn};

use crate::alignment::align_trial;
use crate::config::ConvertConfig;
use crate::error::{ConvertError, TrialError};
use crate::extraction::extract_pose;
use crate::metrics::ConversionMetrics;
use crate::rig::{aggregate, RigBook, RigDefinition};
use crate::sample::{build_sample, CategorySet, Sample};
use crate::storage::{read_trial, TrialSource};
use crate::types::Trial;

/// Converts one parsed trial into a training sample.
///
/// Pure: no I/O and no shared state, so trials can be mapped in any order or
/// in parallel against the same `rig` and `categories`.
pub fn convert_trial(
    trial: &Trial,
    rig: &RigDefinition,
    trial_id: &str,
    category: &str,
    categories: &CategorySet,
) -> Result<Sample, ConvertError> {
    let window = align_trial(trial)?;
    let raw = extract_pose(trial, window)?;
    debug!("trial '{}': raw pose {:?}", trial_id, raw.positions.dim());
    let pose = aggregate(&raw, rig)?;
    build_sample(trial_id, pose, category, categories)
}

/// Reads, identifies and converts one trial file.
pub fn convert_file(
    path: &Path,
    rigs: &RigBook,
    config: &ConvertConfig,
) -> Result<Sample, TrialError> {
    let source = TrialSource::from_path(path)
        .map_err(|e| TrialError::new(path.display().to_string(), e))?;
    let tag = |e: ConvertError| TrialError::new(source.trial_id.clone(), e);

    info!("converting {} ...", path.display());
    let rig = rigs.get(&config.rig_name).map_err(tag)?;
    let trial = read_trial(path).map_err(tag)?;
    convert_trial(
        &trial,
        rig,
        &source.trial_id,
        &source.category,
        &config.categories,
    )
    .map_err(tag)
}

/// Outcome of a batch. Failures never stop the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub samples: Vec<Sample>,
    pub failures: Vec<TrialError>,
}

impl BatchReport {
    pub fn trial_ids(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.trial_id.as_str()).collect()
    }
}

/// Converts each path independently, collecting successes and failures.
pub fn convert_batch<P: AsRef<Path>>(
    paths: &[P],
    rigs: &RigBook,
    config: &ConvertConfig,
    metrics: Option<&ConversionMetrics>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        match convert_file(path.as_ref(), rigs, config) {
            Ok(sample) => {
                if let Some(m) = metrics {
                    m.record_converted(sample.frames());
                }
                report.samples.push(sample);
            }
            Err(e) => {
                warn!("skipping {}", e);
                if let Some(m) = metrics {
                    m.record_failure(&e.source);
                }
                report.failures.push(e);
            }
        }
    }

    info!(
        "batch done: {} converted, {} rejected",
        report.samples.len(),
        report.failures.len()
    );
    report
}
