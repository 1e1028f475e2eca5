use realfft::num_complex::Complex;
use realfft::{FftError, RealFftPlanner};

/// Default lag cap, also the host-side sample cap before estimation.
pub const DEFAULT_MAX_LAG: usize = 10_000;

/// Lag vs. normalized autocorrelation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlogram {
    pub lags: Vec<usize>,
    /// In `[-1, 1]`, exactly `1.0` at lag 0.
    pub coefficients: Vec<f64>,
}

impl Correlogram {
    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }
}

/// Autocorrelation of `channel` for lags `0..min(max_lag, len)`.
///
/// The coefficient at lag k is the biased lag-k autocovariance of the
/// mean-removed signal over the lag-0 autocovariance. A zero-variance
/// channel correlates only with itself at lag 0.
pub fn estimate_autocorrelation(channel: &[f64], max_lag: usize) -> Correlogram {
    let n = channel.len();
    let num_lags = max_lag.min(n);
    if num_lags == 0 {
        return Correlogram::default();
    }

    // Coefficients are scale-invariant; working in [-1, 1] keeps the sums
    // of squares finite for any finite input.
    let peak = peak_magnitude(channel);
    let scaled: Vec<f64> = channel.iter().map(|x| x / peak).collect();
    let mean = scaled.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = scaled.iter().map(|x| x - mean).collect();
    let variance_sum: f64 = centered.iter().map(|x| x * x).sum();

    let lags: Vec<usize> = (0..num_lags).collect();
    if variance_sum == 0.0 {
        let coefficients = lags.iter().map(|&k| if k == 0 { 1.0 } else { 0.0 }).collect();
        return Correlogram { lags, coefficients };
    }

    let sums = match lagged_products(&centered, num_lags) {
        Ok(sums) => sums,
        Err(e) => {
            log::warn!("autocorrelation: FFT failed: {e}");
            return Correlogram::default();
        }
    };

    let mut coefficients: Vec<f64> = sums
        .iter()
        .map(|s| (s / variance_sum).clamp(-1.0, 1.0))
        .collect();
    coefficients[0] = 1.0;

    Correlogram { lags, coefficients }
}

/// Largest absolute sample, or `1.0` for an all-zero channel.
pub(crate) fn peak_magnitude(x: &[f64]) -> f64 {
    let peak = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if peak > 0.0 {
        peak
    } else {
        1.0
    }
}

/// `sum_t x[t] * x[t + k]` for `k < num_lags`, via zero-padded FFT.
fn lagged_products(x: &[f64], num_lags: usize) -> Result<Vec<f64>, FftError> {
    let nfft = (x.len() + num_lags).next_power_of_two();

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(nfft);
    let c2r = planner.plan_fft_inverse(nfft);

    let mut input = r2c.make_input_vec();
    input[..x.len()].copy_from_slice(x);
    let mut spectrum = r2c.make_output_vec();
    r2c.process(&mut input, &mut spectrum)?;

    for c in spectrum.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }

    let mut output = c2r.make_output_vec();
    c2r.process(&mut spectrum, &mut output)?;

    let scale = nfft as f64;
    Ok(output[..num_lags].iter().map(|v| v / scale).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn direct(x: &[f64], num_lags: usize) -> Vec<f64> {
        let mean = x.iter().sum::<f64>() / x.len() as f64;
        let c: Vec<f64> = x.iter().map(|v| v - mean).collect();
        let c0: f64 = c.iter().map(|v| v * v).sum();
        (0..num_lags)
            .map(|k| (0..c.len() - k).map(|t| c[t] * c[t + k]).sum::<f64>() / c0)
            .collect()
    }

    #[test]
    fn test_lag_zero_is_one_and_bounded() {
        let data: Vec<f64> = (0..500).map(|i| ((i * 37) % 17) as f64 - (i % 5) as f64).collect();
        let acf = estimate_autocorrelation(&data, 200);
        assert_eq!(acf.len(), 200);
        assert_eq!(acf.coefficients[0], 1.0);
        assert!(acf.coefficients.iter().all(|c| (-1.0..=1.0).contains(c)));
        assert_eq!(acf.lags, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_matches_direct_sum() {
        let data: Vec<f64> = (0..257).map(|i| (i as f64 * 0.37).sin() + (i % 3) as f64).collect();
        let acf = estimate_autocorrelation(&data, 257);
        let expected = direct(&data, 257);
        for (got, want) in acf.coefficients.iter().zip(&expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_sine_period_peak() {
        let period = 50;
        let data: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * i as f64 / period as f64).sin())
            .collect();
        let acf = estimate_autocorrelation(&data, DEFAULT_MAX_LAG);
        assert_eq!(acf.len(), 1000);
        assert!(acf.coefficients[period] > 0.9);
        assert!(acf.coefficients[period / 2] < -0.9);
    }

    #[test]
    fn test_lag_cap() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(estimate_autocorrelation(&data, 3).len(), 3);
        assert_eq!(estimate_autocorrelation(&data, 100).len(), 5);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(estimate_autocorrelation(&[], 10).is_empty());
        assert!(estimate_autocorrelation(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_huge_values_stay_bounded() {
        let data: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1e200 } else { -1e200 }).collect();
        let acf = estimate_autocorrelation(&data, 8);
        assert_eq!(acf.len(), 8);
        assert!(acf.coefficients.iter().all(|c| c.is_finite() && (-1.0..=1.0).contains(c)));
        assert_eq!(acf.coefficients[0], 1.0);
        // Alternating signal: odd lags anti-correlate.
        assert!(acf.coefficients[1] < -0.9);
        assert!(acf.coefficients[2] > 0.9);
    }

    #[test]
    fn test_scale_does_not_change_coefficients() {
        let data: Vec<f64> = (0..300).map(|i| (i as f64 * 0.21).sin() + (i % 4) as f64).collect();
        let big: Vec<f64> = data.iter().map(|x| x * 1e250).collect();
        let a = estimate_autocorrelation(&data, 50);
        let b = estimate_autocorrelation(&big, 50);
        for (x, y) in a.coefficients.iter().zip(&b.coefficients) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_channel() {
        let acf = estimate_autocorrelation(&[2.0; 8], 4);
        assert_eq!(acf.coefficients, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_sample() {
        let acf = estimate_autocorrelation(&[7.0], 10);
        assert_eq!(acf.lags, vec![0]);
        assert_eq!(acf.coefficients, vec![1.0]);
    }
}
