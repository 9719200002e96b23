use std::path::Path;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::config::ConvertConfig;
use crate::pipeline::{convert_file, convert_trial};
use crate::rig::RigBook;
use crate::sample::CategorySet;
use crate::storage::read_rig_book;
use crate::types::Trial;

// ──────────────────────────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────────────────────────

fn categories_from(categories_json: Option<&str>) -> anyhow::Result<CategorySet> {
    match categories_json {
        Some(txt) => Ok(serde_json::from_str(txt)?),
        None => Ok(CategorySet::fs_jump()),
    }
}

fn call_convert_trial_json(
    trial_json: &str,
    rig_json: &str,
    rig_name: &str,
    category: &str,
    trial_id: &str,
    categories_json: Option<&str>,
) -> anyhow::Result<String> {
    let categories = categories_from(categories_json)?;
    let rigs = RigBook::from_json_str(rig_json)?;
    let rig = rigs.get(rig_name)?;
    let trial = Trial::from_json_str(trial_json)?;
    let sample = convert_trial(&trial, rig, trial_id, category, &categories)
        .map_err(|e| crate::error::TrialError::new(trial_id, e))?;
    Ok(sample.to_json_value().to_string())
}

fn call_convert_trial_file(path: &str, rig_file: &str, rig_name: &str) -> anyhow::Result<String> {
    let rigs = read_rig_book(Path::new(rig_file))?;
    let config = ConvertConfig {
        rig_name: rig_name.to_string(),
        ..ConvertConfig::default()
    };
    let sample = convert_file(Path::new(path), &rigs, &config)?;
    Ok(sample.to_json_value().to_string())
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3 module
// ──────────────────────────────────────────────────────────────────────────────

/// JSON in (trial + rig document), JSON out (features/labels).
#[pyfunction]
#[pyo3(signature = (trial_json, rig_json, rig_name, category, trial_id = None, categories_json = None))]
fn convert_trial_json(
    trial_json: &str,
    rig_json: &str,
    rig_name: &str,
    category: &str,
    trial_id: Option<&str>,
    categories_json: Option<&str>,
) -> PyResult<String> {
    call_convert_trial_json(
        trial_json,
        rig_json,
        rig_name,
        category,
        trial_id.unwrap_or("trial"),
        categories_json,
    )
    .map_err(|e| PyValueError::new_err(format!("{e:#}")))
}

/// Converts `<..>/<category>/<trial_id>.json` using the default jump categories.
#[pyfunction]
#[pyo3(signature = (path, rig_file, rig_name = crate::config::DEFAULT_RIG_NAME))]
fn convert_trial_file(path: &str, rig_file: &str, rig_name: &str) -> PyResult<String> {
    call_convert_trial_file(path, rig_file, rig_name)
        .map_err(|e| PyValueError::new_err(format!("{e:#}")))
}

#[pymodule]
fn fsjump_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert_trial_json, m)?)?;
    m.add_function(wrap_pyfunction!(convert_trial_file, m)?)?;
    Ok(())
}
