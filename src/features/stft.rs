use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Reusable short-time Fourier transform plan.
///
/// Frames are centered: the input is reflect-padded by `n_fft / 2` on both
/// ends, so `len` samples always produce `len / hop + 1` frames.
pub(crate) struct StftPlan {
    n_fft: usize,
    hop: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl std::fmt::Debug for StftPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StftPlan")
            .field("n_fft", &self.n_fft)
            .field("hop", &self.hop)
            .field("window_len", &self.window.len())
            .finish_non_exhaustive()
    }
}

impl StftPlan {
    pub(crate) fn new(n_fft: usize, hop: usize) -> Self {
        let n_fft = n_fft.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n_fft);
        Self {
            n_fft,
            hop: hop.max(1),
            window: hann_window_periodic(n_fft),
            fft,
        }
    }

    /// Number of spectral bins per frame (`0..=Nyquist`).
    pub(crate) fn bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of centered frames produced for `len` input samples.
    pub(crate) fn frame_count(&self, len: usize) -> usize {
        len / self.hop + 1
    }

    /// Power spectra for all centered frames of `samples`.
    pub(crate) fn power_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let pad = self.n_fft / 2;
        let padded = reflect_pad(samples, pad);
        let bins = self.bins();
        let frames = self.frame_count(samples.len());
        let mut out = Vec::with_capacity(frames);
        let mut buf = vec![Complex::new(0.0_f32, 0.0); self.n_fft];
        for frame_idx in 0..frames {
            let start = frame_idx * self.hop;
            for (i, cell) in buf.iter_mut().enumerate() {
                let sample = padded.get(start + i).copied().unwrap_or(0.0);
                *cell = Complex::new(sample * self.window[i], 0.0);
            }
            self.fft.process(&mut buf);
            let mut power = Vec::with_capacity(bins);
            for bin in &buf[..bins] {
                power.push((bin.re * bin.re + bin.im * bin.im).max(0.0));
            }
            out.push(power);
        }
        out
    }
}

/// Periodic Hann window of the given length.
fn hann_window_periodic(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / length as f32).cos()))
        .collect()
}

/// Mirror `pad` samples on each side without repeating the edge sample.
fn reflect_pad(samples: &[f32], pad: usize) -> Vec<f32> {
    if samples.is_empty() {
        return vec![0.0_f32; pad * 2];
    }
    let len = samples.len();
    let mut out = Vec::with_capacity(len + 2 * pad);
    for i in (1..=pad).rev() {
        out.push(samples[i.min(len - 1)]);
    }
    out.extend_from_slice(samples);
    for i in 1..=pad {
        out.push(samples[len - 1 - i.min(len - 1)]);
    }
    out
}
