use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::ConvertError;

pub const OUTCOME_CONVERTED: &str = "converted";

/// Per-run conversion counters on a private registry.
#[derive(Clone)]
pub struct ConversionMetrics {
    registry: Registry,
    trials: IntCounterVec,
    frames: IntCounter,
}

impl ConversionMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let trials = IntCounterVec::new(
            Opts::new("fsjump_trials_total", "Trials processed, by outcome"),
            &["outcome"],
        )?;
        let frames = IntCounter::new("fsjump_frames_total", "Frames emitted across converted trials")?;
        registry.register(Box::new(trials.clone()))?;
        registry.register(Box::new(frames.clone()))?;
        Ok(Self {
            registry,
            trials,
            frames,
        })
    }

    pub fn record_converted(&self, frames: usize) {
        self.trials.with_label_values(&[OUTCOME_CONVERTED]).inc();
        self.frames.inc_by(frames as u64);
    }

    pub fn record_failure(&self, err: &ConvertError) {
        self.trials.with_label_values(&[err.kind()]).inc();
    }

    pub fn trials_total(&self, outcome: &str) -> u64 {
        self.trials.with_label_values(&[outcome]).get()
    }

    pub fn frames_total(&self) -> u64 {
        self.frames.get()
    }

    /// Prometheus text exposition of the registry.
    pub fn gather_text(&self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
