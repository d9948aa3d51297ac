use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

use crate::error::DecodeError;

/// Raw decoded audio in interleaved `f32` samples.
#[derive(Debug)]
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Decode an audio file into interleaved `f32` samples.
///
/// Corrupt packets inside an otherwise readable stream are skipped; a stream
/// that decodes to nothing is returned empty and left to the caller's
/// empty-audio handling.
pub(crate) fn decode_audio(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;
    let track = format.default_track().ok_or_else(|| DecodeError::NoTrack {
        path: path.to_path_buf(),
    })?;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::NoSampleRate {
            path: path.to_path_buf(),
        })?;
    let channels = codec_params
        .channels
        .ok_or_else(|| DecodeError::NoChannels {
            path: path.to_path_buf(),
        })?
        .count() as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::Codec {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(source) => {
                return Err(DecodeError::Packet {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(_)) => continue,
            Err(source) => {
                return Err(DecodeError::Packet {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
    })
}

/// Read a WAV header and report the clip duration without a full decode.
///
/// Lets callers reject too-short uploads cheaply before running the pipeline.
pub fn probe_wav_duration_seconds(path: &Path) -> Result<f32, DecodeError> {
    let reader = hound::WavReader::open(path).map_err(|source| DecodeError::WavProbe {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = reader.spec();
    let frames = reader.duration() as f32;
    Ok(frames / spec.sample_rate.max(1) as f32)
}
