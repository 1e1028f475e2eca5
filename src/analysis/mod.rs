//! Per-channel estimators.
//!
//! Every function here is pure: it takes a channel (and the sampling rate or
//! lag cap it needs) and returns fresh plot-ready sequences. Degenerate input
//! produces an empty result, never an error.

pub mod autocorr;
pub mod psd;
pub mod rate;

pub use autocorr::{estimate_autocorrelation, Correlogram};
pub use psd::{estimate_psd, segment_length, SpectralEstimate};
pub use rate::estimate_sampling_rate;
