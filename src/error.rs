//! Typed failure taxonomy.
//!
//! thiserror enums with teacher-style named `path`/`source` fields. The four
//! concrete kinds ([`DecodeError`], [`EmptyAudioError`], [`ModelLoadError`],
//! [`EmptyResultError`]) are surfaced to callers; [`AnalyzeError`] is the union
//! propagated unmodified by [`crate::Detector::analyze`].

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Failure decoding, probing, or resampling an input file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open audio file `{path}`")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to probe audio format of `{path}`")]
    Probe {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("no default track in `{path}`")]
    NoTrack { path: PathBuf },
    #[error("missing sample rate in `{path}`")]
    NoSampleRate { path: PathBuf },
    #[error("missing channel layout in `{path}`")]
    NoChannels { path: PathBuf },
    #[error("failed to construct a decoder for `{path}`")]
    Codec {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("failed to decode a packet from `{path}`")]
    Packet {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },
    #[error("failed to read WAV header of `{path}`")]
    WavProbe {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("failed to resample `{path}`: {message}")]
    Resample { path: PathBuf, message: String },
}

/// No full-length segment could be produced from the input.
#[derive(Debug, Error)]
#[error(
    "`{path}` produced no full {segment_seconds}s segment: {samples} samples at {sample_rate} Hz"
)]
pub struct EmptyAudioError {
    pub path: PathBuf,
    pub samples: usize,
    pub sample_rate: u32,
    pub segment_seconds: u32,
}

/// Failure loading or validating the classifier checkpoint.
///
/// Returned by [`crate::Detector::load`] at startup, never per request.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("checkpoint file `{path}` not found")]
    Missing { path: PathBuf },
    #[error("failed to load checkpoint record from `{path}`: {message}")]
    Record { path: PathBuf, message: String },
    #[error("invalid pipeline configuration")]
    Config(#[from] ConfigError),
}

/// Aggregator guard: asked to aggregate zero segment predictions.
#[derive(Debug, Error)]
#[error("cannot aggregate an empty set of segment predictions")]
pub struct EmptyResultError;

/// Typed union propagated unmodified by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    EmptyAudio(#[from] EmptyAudioError),
    #[error(transparent)]
    EmptyResult(#[from] EmptyResultError),
}
