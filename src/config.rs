//! Shared shape configuration.
//!
//! One validated object ([`PipelineConfig`]) from which both the feature
//! extractor and the classifier derive their dimensions, so the two halves of
//! the pipeline can never disagree about the tensor shape. The flatten size
//! `channels × (n_mels / 8) × (frames / 8)` is computed here once.
//!
//! Values reproduce `original_source/fast_api/audio_processor.py` and
//! `model.py`: 16 kHz, 3 s segments, FFT 512, hop 160, 128 mel bands,
//! 20 Hz–8 kHz, channel depths 16/32/64, 128 hidden units, 8× pooling.

use thiserror::Error;

/// Convolution channel depths for the three stages (`1 → 16 → 32 → 64`).
pub const CONV_CHANNELS: [usize; 3] = [16, 32, 64];

/// Width of the first fully connected layer.
pub const HIDDEN_UNITS: usize = 128;

/// Total downsampling applied by the three 2×2 max-pool stages.
const POOL_FACTOR: usize = 8;

/// Shared shape configuration for the whole inference pipeline.
///
/// Both the feature extractor and the classifier are built from one of these,
/// so their expectations about the spectrogram shape stay in lockstep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Canonical working sample rate in hertz.
    pub sample_rate: u32,
    /// Segment length in whole seconds.
    pub segment_seconds: u32,
    /// FFT size for the STFT.
    pub n_fft: usize,
    /// Hop length between consecutive STFT frames, in samples.
    pub hop_length: usize,
    /// Number of mel bands.
    pub n_mels: usize,
    /// Lowest mel filterbank edge, in hertz.
    pub f_min: f32,
    /// Highest mel filterbank edge, in hertz.
    pub f_max: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            segment_seconds: 3,
            n_fft: 512,
            hop_length: 160,
            n_mels: 128,
            f_min: 20.0,
            f_max: 8_000.0,
        }
    }
}

impl PipelineConfig {
    /// Samples in one fixed-length segment (`sample_rate × segment_seconds`).
    pub fn segment_samples(&self) -> usize {
        self.sample_rate as usize * self.segment_seconds as usize
    }

    /// Frames produced for one segment by the centered STFT
    /// (`segment_samples / hop + 1`).
    pub fn frames_per_segment(&self) -> usize {
        self.segment_samples() / self.hop_length.max(1) + 1
    }

    /// Flattened feature length entering the first fully connected layer:
    /// `last_conv_channels × (n_mels / 8) × (frames / 8)`.
    pub fn flattened_size(&self) -> usize {
        let channels = CONV_CHANNELS[CONV_CHANNELS.len() - 1];
        channels * (self.n_mels / POOL_FACTOR) * (self.frames_per_segment() / POOL_FACTOR)
    }

    /// Reject a degenerate configuration before it reaches model load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::NonPositive {
                field: "sample_rate",
            });
        }
        if self.segment_seconds == 0 {
            return Err(ConfigError::NonPositive {
                field: "segment_seconds",
            });
        }
        if self.n_fft == 0 {
            return Err(ConfigError::NonPositive { field: "n_fft" });
        }
        if self.hop_length == 0 {
            return Err(ConfigError::NonPositive {
                field: "hop_length",
            });
        }
        if self.n_mels == 0 {
            return Err(ConfigError::NonPositive { field: "n_mels" });
        }
        Ok(())
    }
}

/// Invalid [`PipelineConfig`] rejected at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pipeline configuration field `{field}` must be greater than zero")]
    NonPositive { field: &'static str },
}
