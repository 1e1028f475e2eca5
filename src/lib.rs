//! PRISM: ingestion and spectral analysis of time-series CSV files.
//!
//! ```text
//!  file ──► data::loader ──► LoadedSignal { table, sampling_rate }
//!                                 │
//!             channel k ──────────┼──────────────┐
//!                                 ▼              ▼
//!                        analysis::psd   analysis::autocorr
//!                      SpectralEstimate     Correlogram
//! ```
//!
//! [`state::AnalysisSession`] holds the loaded dataset, selected channel and
//! smoothing level for a host application.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use analysis::{
    estimate_autocorrelation, estimate_psd, estimate_sampling_rate, Correlogram, SpectralEstimate,
};
pub use config::AnalysisConfig;
pub use data::loader::{load_file, load_file_with, IngestOptions};
pub use data::model::{LoadedSignal, SignalTable};
pub use error::IngestError;
pub use state::AnalysisSession;
