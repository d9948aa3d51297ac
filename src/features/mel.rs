/// Slaney-scale mel filterbank with area normalization.
///
/// Filters are stored sparsely as `(bin, weight)` pairs; triangle weights are
/// evaluated at the continuous bin center frequencies so narrow low-frequency
/// filters keep fractional coverage instead of snapping to bin edges.
#[derive(Debug)]
pub(crate) struct MelBank {
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelBank {
    pub(crate) fn new(sample_rate: u32, n_fft: usize, n_mels: usize, f_min: f32, f_max: f32) -> Self {
        let n_freqs = n_fft / 2 + 1;
        let nyquist = sample_rate.max(1) as f32 * 0.5;
        let f_max = f_max.min(nyquist).max(f_min);
        let bin_freqs: Vec<f32> = (0..n_freqs)
            .map(|i| nyquist * i as f32 / (n_freqs.max(2) - 1) as f32)
            .collect();

        let mel_min = hz_to_mel(f_min);
        let mel_max = hz_to_mel(f_max);
        let edges: Vec<f32> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32))
            .collect();

        let mut filters = Vec::with_capacity(n_mels);
        for m in 0..n_mels {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
            // Slaney area normalization keeps per-band energy comparable.
            let norm = 2.0 / (right - left).max(f32::EPSILON);
            let mut weights = Vec::new();
            for (bin, &freq) in bin_freqs.iter().enumerate() {
                let up = (freq - left) / (center - left).max(f32::EPSILON);
                let down = (right - freq) / (right - center).max(f32::EPSILON);
                let weight = up.min(down).max(0.0);
                if weight > 0.0 {
                    weights.push((bin, weight * norm));
                }
            }
            filters.push(weights);
        }
        Self { filters }
    }

    pub(crate) fn n_mels(&self) -> usize {
        self.filters.len()
    }

    /// Apply the filterbank to one power spectrum frame.
    pub(crate) fn apply_into(&self, power: &[f32], out: &mut [f32]) {
        for (idx, filter) in self.filters.iter().enumerate() {
            let mut sum = 0.0_f64;
            for &(bin, weight) in filter {
                let p = power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64;
                sum += p * weight as f64;
            }
            if let Some(slot) = out.get_mut(idx) {
                *slot = sum as f32;
            }
        }
    }
}

fn hz_to_mel(hz: f32) -> f32 {
    const F_SP: f32 = 200.0 / 3.0;
    const MIN_LOG_HZ: f32 = 1_000.0;
    const MIN_LOG_MEL: f32 = 15.0;
    let logstep = (6.4_f32).ln() / 27.0;
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / logstep
    } else {
        hz / F_SP
    }
}

fn mel_to_hz(mel: f32) -> f32 {
    const F_SP: f32 = 200.0 / 3.0;
    const MIN_LOG_MEL: f32 = 15.0;
    let logstep = (6.4_f32).ln() / 27.0;
    if mel >= MIN_LOG_MEL {
        1_000.0 * ((mel - MIN_LOG_MEL) * logstep).exp()
    } else {
        mel * F_SP
    }
}
