//! Adaptive-resolution Welch estimate of the amplitude spectral density.
//!
//! The smoothing level (1..=10) picks the Welch segment length by
//! interpolating in log space between half the record (level 1) and
//! [`MIN_SEGMENT_LENGTH`] samples (level 10). Equal level steps then give
//! equal visual steps of smoothing on a log-frequency plot.

use std::f64::consts::PI;

use realfft::RealFftPlanner;

use super::autocorr::peak_magnitude;

/// Shortest planned Welch segment.
pub const MIN_SEGMENT_LENGTH: usize = 512;

/// Least smoothing (finest frequency resolution).
pub const MIN_SMOOTHING_LEVEL: u8 = 1;

/// Most smoothing (lowest estimator variance).
pub const MAX_SMOOTHING_LEVEL: u8 = 10;

// ---------------------------------------------------------------------------
// SpectralEstimate
// ---------------------------------------------------------------------------

/// Amplitude spectral density of one channel.
///
/// An empty estimate means "nothing to plot".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralEstimate {
    /// Bin frequencies, ascending from 0 to Nyquist.
    pub frequencies: Vec<f64>,
    /// `sqrt(PSD)` per bin, in amplitude units per √Hz.
    pub amplitudes: Vec<f64>,
    /// Samples per segment actually used.
    pub segment_length: usize,
    /// Number of averaged segments.
    pub segments: usize,
}

impl SpectralEstimate {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Bin spacing in Hz, `0.0` when empty.
    pub fn resolution(&self) -> f64 {
        match self.frequencies.as_slice() {
            [_, f1, ..] => *f1,
            _ => 0.0,
        }
    }

    /// Frequency and amplitude of the strongest non-DC bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(&self.amplitudes)
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&f, &a)| (f, a))
    }
}

// ---------------------------------------------------------------------------
// Segment length
// ---------------------------------------------------------------------------

/// Planned Welch segment length for a channel of `n` samples.
///
/// Level 1 maps to `max(512, n / 2)`, level 10 to 512, with log-space
/// interpolation between them. The result is clamped into that range and
/// rounded down to an even number. Levels outside 1..=10 are clamped.
pub fn segment_length(n: usize, level: u8) -> usize {
    let level = level.clamp(MIN_SMOOTHING_LEVEL, MAX_SMOOTHING_LEVEL);
    let longest = MIN_SEGMENT_LENGTH.max(n / 2);
    let shortest = MIN_SEGMENT_LENGTH;

    let alpha = f64::from(level - MIN_SMOOTHING_LEVEL)
        / f64::from(MAX_SMOOTHING_LEVEL - MIN_SMOOTHING_LEVEL);
    let log_longest = (longest as f64).log10();
    let log_shortest = (shortest as f64).log10();
    let interpolated = 10f64.powf(log_longest + alpha * (log_shortest - log_longest)) as usize;

    let even = interpolated.clamp(shortest, longest) / 2 * 2;
    if even == 0 {
        n
    } else {
        even
    }
}

// ---------------------------------------------------------------------------
// Estimator
// ---------------------------------------------------------------------------

/// Amplitude spectral density of `channel` sampled at `sampling_rate`.
///
/// Returns an empty estimate when the rate is not a positive finite number
/// or the channel has fewer than two samples.
pub fn estimate_psd(channel: &[f64], sampling_rate: f64, smoothing_level: u8) -> SpectralEstimate {
    if !(sampling_rate > 0.0 && sampling_rate.is_finite()) || channel.len() < 2 {
        return SpectralEstimate::default();
    }

    let nperseg = segment_length(channel.len(), smoothing_level);
    log::debug!(
        "PSD: {} samples, level {smoothing_level}, nperseg {nperseg}",
        channel.len()
    );
    welch(channel, sampling_rate, nperseg)
}

/// Welch's averaged periodogram with a periodic Hann window, 50% overlap,
/// per-segment mean removal and one-sided density scaling, followed by an
/// elementwise square root.
///
/// Segments longer than the record are shortened to the record length.
/// A rate that is not positive and finite gives an empty estimate.
pub fn welch(data: &[f64], sampling_rate: f64, nperseg: usize) -> SpectralEstimate {
    if !(sampling_rate > 0.0 && sampling_rate.is_finite()) {
        return SpectralEstimate::default();
    }
    let seg = nperseg.min(data.len());
    if seg < 2 {
        return SpectralEstimate::default();
    }
    let step = seg - seg / 2;
    let num_segments = (data.len() - seg) / step + 1;

    let window = hann(seg);
    let scale = 1.0 / (sampling_rate * window.iter().map(|w| w * w).sum::<f64>());

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(seg);
    let mut input = r2c.make_input_vec();
    let mut spectrum = r2c.make_output_vec();
    let mut power = vec![0.0; spectrum.len()];

    // Squared magnitudes are accumulated on data scaled into [-1, 1] and the
    // peak is multiplied back after the square root.
    let peak = peak_magnitude(data);

    for s in 0..num_segments {
        let segment = &data[s * step..s * step + seg];
        let mean = segment.iter().map(|x| x / peak).sum::<f64>() / seg as f64;
        for ((slot, &x), &w) in input.iter_mut().zip(segment).zip(&window) {
            *slot = (x / peak - mean) * w;
        }

        if let Err(e) = r2c.process(&mut input, &mut spectrum) {
            log::warn!("PSD: FFT of segment {s} failed: {e}");
            return SpectralEstimate::default();
        }
        for (acc, c) in power.iter_mut().zip(&spectrum) {
            *acc += c.norm_sqr();
        }
    }

    // One-sided: fold negative frequencies onto all bins but DC and, for an
    // even segment, Nyquist.
    let last = power.len() - 1;
    let fold_end = if seg % 2 == 0 { last } else { last + 1 };
    let norm = scale / num_segments as f64;
    let amplitudes = power
        .iter()
        .enumerate()
        .map(|(k, &p)| {
            let fold = if k > 0 && k < fold_end { 2.0 } else { 1.0 };
            (p * norm * fold).sqrt() * peak
        })
        .collect();

    let df = sampling_rate / seg as f64;
    let frequencies = (0..power.len()).map(|k| k as f64 * df).collect();

    SpectralEstimate {
        frequencies,
        amplitudes,
        segment_length: seg,
        segments: num_segments,
    }
}

/// Periodic Hann window of `size` points.
pub fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}
