//! PRISM command-line front end.
//!
//! Loads one CSV file and prints a view of one channel as CSV on stdout:
//! - `info`: table shape, channel names and sampling rate
//! - `psd`:  amplitude spectral density (`frequency,amplitude`)
//! - `acf`:  correlogram (`lag,coefficient`)

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use prism::{AnalysisConfig, AnalysisSession};

#[derive(Parser)]
#[command(name = "prism")]
#[command(author, version, about = "Time-series CSV spectral analysis", long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON analysis config; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the cleaned table
    Info {
        /// Input CSV file
        file: PathBuf,
    },

    /// Amplitude spectral density of one channel
    Psd {
        /// Input CSV file
        file: PathBuf,

        /// Channel index, 0 = first column after time
        #[arg(short, long, default_value = "0")]
        channel: usize,

        /// Smoothing level, 1 (finest) to 10 (smoothest)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        smoothing: Option<u8>,
    },

    /// Autocorrelation of one channel
    Acf {
        /// Input CSV file
        file: PathBuf,

        /// Channel index, 0 = first column after time
        #[arg(short, long, default_value = "0")]
        channel: usize,

        /// Maximum number of lags
        #[arg(long)]
        max_lag: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Info { file } => cmd_info(config, &file),
        Commands::Psd {
            file,
            channel,
            smoothing,
        } => cmd_psd(config, &file, channel, smoothing),
        Commands::Acf {
            file,
            channel,
            max_lag,
        } => cmd_acf(config, &file, channel, max_lag),
    }
}

/// Open `file` in a fresh session.
fn open_session(config: AnalysisConfig, file: &Path) -> Result<AnalysisSession> {
    let mut session = AnalysisSession::new(config);
    session
        .load(file)
        .with_context(|| format!("cannot load {}", file.display()))?;
    Ok(session)
}

/// Open `file` and select `channel`.
fn open_channel(config: AnalysisConfig, file: &Path, channel: usize) -> Result<AnalysisSession> {
    let mut session = open_session(config, file)?;
    if !session.select_channel(channel) {
        bail!(
            "channel {channel} out of range, {} has {} channel(s)",
            file.display(),
            session.channel_names().len()
        );
    }
    Ok(session)
}

fn cmd_info(config: AnalysisConfig, file: &Path) -> Result<()> {
    let session = open_session(config, file)?;
    let Some(dataset) = &session.dataset else {
        bail!("no dataset loaded");
    };

    let table = &dataset.table;
    let mut rows = vec![
        ("file".to_string(), file.display().to_string()),
        ("header_line".to_string(), dataset.header_line.to_string()),
        ("rows".to_string(), table.len().to_string()),
        ("columns".to_string(), table.num_columns().to_string()),
        ("sampling_rate".to_string(), dataset.sampling_rate.to_string()),
    ];
    if let Some(time) = table.columns().first() {
        rows.push(("time_column".to_string(), time.name.clone()));
    }
    for (i, name) in session.channel_names().into_iter().enumerate() {
        rows.push((format!("channel_{i}"), name));
    }

    let mut out = csv::Writer::from_writer(io::stdout());
    out.write_record(["key", "value"])?;
    for (key, value) in &rows {
        out.write_record([key, value])?;
    }
    out.flush().context("writing info")?;
    Ok(())
}

fn cmd_psd(
    config: AnalysisConfig,
    file: &Path,
    channel: usize,
    smoothing: Option<u8>,
) -> Result<()> {
    let mut session = open_channel(config, file, channel)?;
    if let Some(level) = smoothing {
        session.set_smoothing_level(level);
    }

    let estimate = session.spectrum();
    if estimate.is_empty() {
        log::warn!("no usable spectrum: sampling rate undefined or channel too short");
    } else {
        log::info!(
            "nperseg {}, {} segment(s), resolution {:.6}",
            estimate.segment_length,
            estimate.segments,
            estimate.resolution()
        );
        if let Some((freq, amp)) = estimate.peak() {
            log::info!("peak at {freq:.6} ({amp:.6e})");
        }
    }

    let mut out = csv::Writer::from_writer(io::stdout());
    out.write_record(["frequency", "amplitude"])?;
    for (f, a) in estimate.frequencies.iter().zip(&estimate.amplitudes) {
        out.write_record([f.to_string(), a.to_string()])?;
    }
    out.flush().context("writing spectrum")?;
    Ok(())
}

fn cmd_acf(
    mut config: AnalysisConfig,
    file: &Path,
    channel: usize,
    max_lag: Option<usize>,
) -> Result<()> {
    if let Some(lags) = max_lag {
        if lags == 0 {
            bail!("--max-lag must be at least 1");
        }
        config.max_lag = lags;
    }
    let session = open_channel(config, file, channel)?;

    let correlogram = session.correlogram();
    log::info!("{} lag(s)", correlogram.len());

    let mut out = csv::Writer::from_writer(io::stdout());
    out.write_record(["lag", "coefficient"])?;
    for (lag, c) in correlogram.lags.iter().zip(&correlogram.coefficients) {
        out.write_record([lag.to_string(), c.to_string()])?;
    }
    out.flush().context("writing correlogram")?;
    Ok(())
}
