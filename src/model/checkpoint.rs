use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::Backend;

use super::cnn::DetectorCnn;
use crate::config::PipelineConfig;
use crate::error::ModelLoadError;

/// Checkpoint file extension used by the named-MessagePack recorder.
pub(crate) const CHECKPOINT_EXT: &str = "mpk";

/// Load the frozen parameter set into a freshly initialized architecture.
///
/// Fails fast: a missing file, an unreadable record, or parameter shapes
/// that do not match the configured architecture are all load-time errors;
/// nothing is deferred to inference.
pub(crate) fn load_checkpoint<B: Backend>(
    path: &Path,
    config: &PipelineConfig,
    device: &B::Device,
) -> Result<DetectorCnn<B>, ModelLoadError> {
    let file: PathBuf = path.with_extension(CHECKPOINT_EXT);
    if !file.exists() {
        return Err(ModelLoadError::Missing { path: file });
    }
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let model = DetectorCnn::<B>::init(config, device);
    model
        .load_file(file.clone(), &recorder, device)
        .map_err(|err| ModelLoadError::Record {
            path: file,
            message: err.to_string(),
        })
}
