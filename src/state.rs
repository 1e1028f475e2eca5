use std::path::Path;

use crate::analysis::autocorr::{estimate_autocorrelation, Correlogram};
use crate::analysis::psd::{estimate_psd, SpectralEstimate, MAX_SMOOTHING_LEVEL, MIN_SMOOTHING_LEVEL};
use crate::config::AnalysisConfig;
use crate::data::loader::load_file_with;
use crate::data::model::LoadedSignal;
use crate::error::IngestError;

// ---------------------------------------------------------------------------
// Analysis session
// ---------------------------------------------------------------------------

/// What a host keeps between user actions: one loaded dataset, the channel
/// being looked at and the smoothing level. Views are recomputed on demand;
/// nothing derived is cached.
pub struct AnalysisSession {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<LoadedSignal>,

    /// Selected channel, counted from the first non-time column.
    pub selected_channel: Option<usize>,

    /// Current Welch smoothing level (1..=10).
    pub smoothing_level: u8,

    /// Status / error message for the host to display.
    pub status_message: Option<String>,

    pub config: AnalysisConfig,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            dataset: None,
            selected_channel: None,
            smoothing_level: config.smoothing_level,
            status_message: None,
            config,
        }
    }

    /// Load a file, replacing any previous dataset.
    ///
    /// On failure the previous dataset is dropped and the error is returned
    /// to the caller to report. The loader logs successful loads.
    pub fn load(&mut self, path: &Path) -> Result<(), IngestError> {
        match load_file_with(path, &self.config.ingest) {
            Ok(dataset) => {
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                self.dataset = None;
                self.selected_channel = None;
                Err(e)
            }
        }
    }

    /// [`load`](Self::load) for interactive hosts: a failure is logged and
    /// kept in `status_message`, and `false` is returned.
    pub fn open_file(&mut self, path: &Path) -> bool {
        match self.load(path) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    /// Ingest a newly loaded dataset and select its first channel.
    pub fn set_dataset(&mut self, dataset: LoadedSignal) {
        self.selected_channel = (dataset.table.num_channels() > 0).then_some(0);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Names of the selectable (non-time) channels.
    pub fn channel_names(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|ds| {
                ds.table
                    .columns()
                    .iter()
                    .skip(1)
                    .map(|c| c.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Select a channel; out-of-range indices are ignored.
    pub fn select_channel(&mut self, index: usize) -> bool {
        let valid = self
            .dataset
            .as_ref()
            .is_some_and(|ds| index < ds.table.num_channels());
        if valid {
            self.selected_channel = Some(index);
        }
        valid
    }

    /// Set the smoothing level, clamped into 1..=10.
    pub fn set_smoothing_level(&mut self, level: u8) {
        let clamped = level.clamp(MIN_SMOOTHING_LEVEL, MAX_SMOOTHING_LEVEL);
        if clamped != level {
            log::warn!("smoothing level {level} out of range, using {clamped}");
        }
        self.smoothing_level = clamped;
    }

    /// Time axis and samples of the selected channel.
    pub fn time_series(&self) -> Option<(&[f64], &[f64])> {
        let ds = self.dataset.as_ref()?;
        let channel = ds.table.channel(self.selected_channel?)?;
        Some((ds.table.time(), channel.values.as_slice()))
    }

    /// Amplitude spectral density of the selected channel.
    pub fn spectrum(&self) -> SpectralEstimate {
        match (&self.dataset, self.time_series()) {
            (Some(ds), Some((_, samples))) => {
                estimate_psd(samples, ds.sampling_rate, self.smoothing_level)
            }
            _ => SpectralEstimate::default(),
        }
    }

    /// Correlogram of the selected channel, over at most
    /// `max_autocorr_samples` leading samples.
    pub fn correlogram(&self) -> Correlogram {
        match self.time_series() {
            Some((_, samples)) => {
                let head = &samples[..samples.len().min(self.config.max_autocorr_samples)];
                estimate_autocorrelation(head, self.config.max_lag)
            }
            None => Correlogram::default(),
        }
    }
}
