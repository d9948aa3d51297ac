//! Audio deepfake screening: decode → segment → log-mel → CNN → verdict.
//!
//! The crate covers the inference pipeline only. A caller supplies a
//! readable audio file and a trained checkpoint; [`Detector::analyze`]
//! resamples to 16 kHz, cuts the waveform into fixed 3-second segments
//! (dropping any trailing remainder), classifies each segment's log-mel
//! spectrogram with a small convolutional network, and aggregates the
//! per-segment verdicts into a [`FileResult`].
//!
//! `analyze` is a blocking unit of work; offload it to a worker thread when
//! serving an event-driven front end. The loaded weights are immutable and
//! shared, so one [`Detector`] may be used from many threads at once.
//!
//! ```no_run
//! use std::path::Path;
//! use voxscreen::{Detector, DevicePreference};
//!
//! let detector = Detector::load(Path::new("detector.mpk"), DevicePreference::Cpu)?;
//! let result = detector.analyze(Path::new("clip.wav"))?;
//! println!("{} ({:.1}% AI)", result.overall_prediction, result.percent_ai);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Verdict aggregation over ordered segment predictions.
pub mod aggregate;
/// Audio decoding, resampling, and segmentation.
pub mod audio;
/// Shared shape configuration.
pub mod config;
/// The end-to-end analysis pipeline.
pub mod detector;
/// Typed failure taxonomy.
pub mod error;
/// Log-mel feature extraction.
pub mod features;
/// Classifier model and checkpoint loading.
pub mod model;

pub use aggregate::{FileResult, SegmentLabel, SegmentPrediction, SegmentReport, Verdict, aggregate};
pub use config::PipelineConfig;
pub use detector::Detector;
pub use error::{AnalyzeError, DecodeError, EmptyAudioError, EmptyResultError, ModelLoadError};
pub use model::{DetectorCnn, DevicePreference};
