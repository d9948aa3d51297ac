use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const CHUNK_FRAMES: usize = 1024;

/// Windowed-sinc resampling of a mono buffer to `output_rate`.
///
/// The converter is the accuracy-sensitive step of the pipeline; sinc
/// interpolation keeps frequency content intact up to the new Nyquist, which
/// linear interpolation would not. The resampler's inherent output delay is
/// trimmed so the result stays time-aligned with the input.
pub(crate) fn resample(
    samples: &[f32],
    input_rate: u32,
    output_rate: u32,
) -> Result<Vec<f32>, String> {
    let input_rate = input_rate.max(1);
    let output_rate = output_rate.max(1);
    if samples.is_empty() || input_rate == output_rate {
        return Ok(samples.to_vec());
    }

    let ratio = output_rate as f64 / input_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1)
        .map_err(|err| format!("resampler construction failed: {err}"))?;
    let delay = resampler.output_delay();
    let expected = (samples.len() as f64 * ratio).ceil() as usize;

    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);
    let mut pos = 0usize;
    while pos + CHUNK_FRAMES <= samples.len() {
        let chunk: &[&[f32]] = &[&samples[pos..pos + CHUNK_FRAMES]];
        let frames = resampler
            .process(chunk, None)
            .map_err(|err| format!("resampling failed: {err}"))?;
        out.extend_from_slice(&frames[0]);
        pos += CHUNK_FRAMES;
    }
    if pos < samples.len() {
        let tail: &[&[f32]] = &[&samples[pos..]];
        let frames = resampler
            .process_partial(Some(tail), None)
            .map_err(|err| format!("resampling failed: {err}"))?;
        out.extend_from_slice(&frames[0]);
    }
    // Drain the internal delay line until the target length is covered.
    while out.len() < delay + expected {
        let frames = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|err| format!("resampler flush failed: {err}"))?;
        if frames[0].is_empty() {
            break;
        }
        out.extend_from_slice(&frames[0]);
    }

    out.drain(..delay.min(out.len()));
    out.truncate(expected);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let len = (sample_rate as f32 * seconds).round() as usize;
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / samples.len() as f64).sqrt() as f32
    }

    #[test]
    fn passthrough_when_rates_match() {
        let input = sine(440.0, 16_000, 0.25);
        let out = resample(&input, 16_000, 16_000).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn upsample_doubles_length() {
        let input = sine(440.0, 8_000, 1.0);
        let out = resample(&input, 8_000, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn downsample_hits_expected_length() {
        let input = sine(440.0, 44_100, 1.0);
        let out = resample(&input, 44_100, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn midband_energy_is_preserved() {
        let input = sine(440.0, 44_100, 1.0);
        let out = resample(&input, 44_100, 16_000).unwrap();
        // Ignore the edge transients when comparing energy.
        let body_in = &input[4_410..input.len() - 4_410];
        let body_out = &out[1_600..out.len() - 1_600];
        assert!((rms(body_in) - rms(body_out)).abs() < 0.02);
    }

    #[test]
    fn short_tail_still_resamples() {
        let input = sine(440.0, 44_100, 0.01);
        let out = resample(&input, 44_100, 16_000).unwrap();
        let expected = (441.0_f64 * 16_000.0 / 44_100.0).ceil() as usize;
        assert_eq!(out.len(), expected);
    }
}
