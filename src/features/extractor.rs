use super::mel::MelBank;
use super::stft::StftPlan;
use crate::config::PipelineConfig;

/// Additive floor applied before the log so zero-power bands stay finite.
/// A numeric-safety constant, not a tunable.
pub(crate) const LOG_EPSILON: f32 = 1e-9;

/// Log-mel feature extractor with a fixed output shape.
///
/// Stateless after construction: `extract` borrows `self` immutably and
/// allocates its own working buffers, so one extractor can serve concurrent
/// inference calls.
#[derive(Debug)]
pub(crate) struct FeatureExtractor {
    stft: StftPlan,
    mel: MelBank,
    n_mels: usize,
    frames: usize,
}

impl FeatureExtractor {
    pub(crate) fn new(config: &PipelineConfig) -> Self {
        Self {
            stft: StftPlan::new(config.n_fft, config.hop_length),
            mel: MelBank::new(
                config.sample_rate,
                config.n_fft,
                config.n_mels,
                config.f_min,
                config.f_max,
            ),
            n_mels: config.n_mels,
            frames: config.frames_per_segment(),
        }
    }

    /// Flat tensor length: `n_mels * frames` (one channel).
    pub(crate) fn feature_len(&self) -> usize {
        self.n_mels * self.frames
    }

    /// Segment samples → flat log-mel tensor in `[mel][frame]` layout.
    ///
    /// The time axis is truncated or zero-padded to the configured frame
    /// count, so the output shape never depends on the input content.
    pub(crate) fn extract(&self, segment: &[f32]) -> Vec<f32> {
        let power_frames = self.stft.power_frames(segment);
        let mut out = vec![0.0_f32; self.feature_len()];
        let mut mel_buf = vec![0.0_f32; self.mel.n_mels()];
        for (frame_idx, power) in power_frames.iter().take(self.frames).enumerate() {
            self.mel.apply_into(power, &mut mel_buf);
            for (mel_idx, &value) in mel_buf.iter().enumerate() {
                out[mel_idx * self.frames + frame_idx] = (value.max(0.0) + LOG_EPSILON).ln();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(&PipelineConfig::default())
    }

    fn sine_segment(freq: f32) -> Vec<f32> {
        (0..48_000)
            .map(|i| (2.0 * PI * freq * i as f32 / 16_000.0).sin() * 0.5)
            .collect()
    }

    #[test]
    fn output_shape_is_fixed() {
        let extractor = extractor();
        assert_eq!(extractor.feature_len(), 128 * 301);
        assert_eq!(extractor.extract(&vec![0.0; 48_000]).len(), 128 * 301);
        assert_eq!(extractor.extract(&sine_segment(440.0)).len(), 128 * 301);
    }

    #[test]
    fn silence_maps_to_the_epsilon_floor() {
        let features = extractor().extract(&vec![0.0_f32; 48_000]);
        let floor = LOG_EPSILON.ln();
        assert!(features.iter().all(|&v| (v - floor).abs() < 1e-4));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = extractor();
        let segment = sine_segment(440.0);
        let first = extractor.extract(&segment);
        let second = extractor.extract(&segment);
        assert_eq!(first, second);
    }

    #[test]
    fn tone_rises_above_the_silence_floor() {
        let features = extractor().extract(&sine_segment(440.0));
        let floor = LOG_EPSILON.ln();
        assert!(features.iter().all(|v| v.is_finite()));
        assert!(features.iter().any(|&v| v > floor + 5.0));
    }

    #[test]
    fn overlong_input_is_truncated_to_fixed_frames() {
        let extractor = extractor();
        let long: Vec<f32> = (0..60_000).map(|i| (i as f32 * 0.001).sin()).collect();
        assert_eq!(extractor.extract(&long).len(), extractor.feature_len());
    }
}
