use std::path::Path;

use burn::tensor::{ElementConversion, Tensor, TensorData, backend::Backend};
use tracing::{debug, info};

use crate::aggregate::{self, FileResult, SegmentPrediction};
use crate::audio::{
    decode_audio, downmix_to_mono, resample, sanitize_samples_in_place, segment_count, segments,
};
use crate::config::PipelineConfig;
use crate::error::{AnalyzeError, DecodeError, EmptyAudioError, ModelLoadError};
use crate::features::FeatureExtractor;
use crate::model::{CpuBackend, CpuDevice, DetectorCnn, DevicePreference, GpuBackend, GpuDevice};
#[cfg(feature = "cuda")]
use crate::model::{CudaBackend, CudaComputeDevice};

#[derive(Debug)]
enum DetectorInner {
    Cpu {
        model: DetectorCnn<CpuBackend>,
        device: CpuDevice,
    },
    Wgpu {
        model: DetectorCnn<GpuBackend>,
        device: GpuDevice,
    },
    #[cfg(feature = "cuda")]
    Cuda {
        model: DetectorCnn<CudaBackend>,
        device: CudaComputeDevice,
    },
}

/// Loaded classifier plus the shared shape configuration.
///
/// Weights are frozen at load and shared read-only; `analyze` borrows `self`
/// immutably and allocates its own working tensors, so concurrent calls from
/// multiple threads are safe without locking.
#[derive(Debug)]
pub struct Detector {
    inner: DetectorInner,
    extractor: FeatureExtractor,
    config: PipelineConfig,
}

impl Detector {
    /// Load the checkpoint once with the default pipeline configuration.
    pub fn load(checkpoint: &Path, preference: DevicePreference) -> Result<Self, ModelLoadError> {
        Self::load_with_config(checkpoint, preference, PipelineConfig::default())
    }

    /// Load the checkpoint once for an explicit configuration.
    ///
    /// Fails fast on an invalid configuration or a missing/mismatched
    /// checkpoint; a process that cannot load its model should not serve.
    pub fn load_with_config(
        checkpoint: &Path,
        preference: DevicePreference,
        config: PipelineConfig,
    ) -> Result<Self, ModelLoadError> {
        config.validate()?;
        let inner = match preference {
            DevicePreference::Cpu => {
                let device = CpuDevice::default();
                let model = crate::model::load_checkpoint::<CpuBackend>(checkpoint, &config, &device)?;
                DetectorInner::Cpu { model, device }
            }
            DevicePreference::Wgpu => {
                let device = GpuDevice::default();
                let model = crate::model::load_checkpoint::<GpuBackend>(checkpoint, &config, &device)?;
                DetectorInner::Wgpu { model, device }
            }
            #[cfg(feature = "cuda")]
            DevicePreference::Cuda => {
                let device = CudaComputeDevice::default();
                let model =
                    crate::model::load_checkpoint::<CudaBackend>(checkpoint, &config, &device)?;
                DetectorInner::Cuda { model, device }
            }
        };
        info!(
            ?preference,
            "loaded detector checkpoint from {}",
            checkpoint.display()
        );
        let extractor = FeatureExtractor::new(&config);
        Ok(Self {
            inner,
            extractor,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode, segment, classify, and aggregate one audio file.
    ///
    /// Segments are processed in playback order so the aggregated timeline
    /// matches the file. A failure yields no result; there is no partial or
    /// resumable state.
    pub fn analyze(&self, path: &Path) -> Result<FileResult, AnalyzeError> {
        let decoded = decode_audio(path)?;
        let mono = downmix_to_mono(&decoded.samples, decoded.channels);
        let mut wave = if decoded.sample_rate != self.config.sample_rate {
            resample(&mono, decoded.sample_rate, self.config.sample_rate).map_err(|message| {
                DecodeError::Resample {
                    path: path.to_path_buf(),
                    message,
                }
            })?
        } else {
            mono
        };
        sanitize_samples_in_place(&mut wave);

        let segment_samples = self.config.segment_samples();
        if wave.len() < segment_samples {
            return Err(EmptyAudioError {
                path: path.to_path_buf(),
                samples: wave.len(),
                sample_rate: self.config.sample_rate,
                segment_seconds: self.config.segment_seconds,
            }
            .into());
        }

        let mut predictions = Vec::with_capacity(segment_count(wave.len(), segment_samples));
        for segment in segments(&wave, segment_samples) {
            let features = self.extractor.extract(segment);
            let probability = self.predict(features);
            predictions.push(SegmentPrediction::from_probability(probability));
        }
        debug!(
            "classified {} segments from {}",
            predictions.len(),
            path.display()
        );

        let result = aggregate::aggregate(&predictions, self.config.segment_seconds)?;
        Ok(result)
    }

    fn predict(&self, features: Vec<f32>) -> f32 {
        match &self.inner {
            DetectorInner::Cpu { model, device } => {
                run_forward(model, device, features, &self.config)
            }
            DetectorInner::Wgpu { model, device } => {
                run_forward(model, device, features, &self.config)
            }
            #[cfg(feature = "cuda")]
            DetectorInner::Cuda { model, device } => {
                run_forward(model, device, features, &self.config)
            }
        }
    }
}

fn run_forward<B: Backend>(
    model: &DetectorCnn<B>,
    device: &B::Device,
    features: Vec<f32>,
    config: &PipelineConfig,
) -> f32 {
    let shape = [1, 1, config.n_mels, config.frames_per_segment()];
    let input = Tensor::<B, 4>::from_data(TensorData::new(features, shape), device);
    model.forward(input).into_scalar().elem::<f32>()
}
