//! Converts multi-marker motion-capture trials into fixed-topology skeletal
//! pose samples (per-frame features + labels) for action classification.

pub mod alignment;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod metrics;
pub mod pipeline;
pub mod rig;
pub mod sample;
pub mod selection;
pub mod storage;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use alignment::{align_trial, common_window, CommonWindow};
pub use config::ConvertConfig;
pub use error::{ConvertError, TrialError};
pub use extraction::{extract_pose, MarkerIndex, RawPose};
pub use pipeline::{convert_batch, convert_file, convert_trial, BatchReport};
pub use rig::{aggregate, RigBook, RigDefinition, RigPose};
pub use sample::{build_sample, CategorySet, Sample};
pub use selection::{select_segment, AuthoritativeWindow};
pub use storage::{load_config, read_rig_book, read_trial, save_config, TrialSource};
pub use types::{FrameRange, Marker, Point3, Segment, Trial, MAX_FRAME_BOUND};
