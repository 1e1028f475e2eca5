/// Sampling rate from the first two timestamps.
///
/// Uniform sampling is assumed and not checked beyond `t[1]`. Returns `0.0`
/// when the step is zero or fewer than two samples are given.
pub fn estimate_sampling_rate(time: &[f64]) -> f64 {
    match time {
        [t0, t1, ..] => {
            let dt = t1 - t0;
            if dt != 0.0 {
                1.0 / dt
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
