//! Write a synthetic multi-channel recording for trying out the pipeline.
//!
//! The file mimics what data loggers produce: a metadata preamble, a header,
//! inline `%` markers inside the data, one row with a missing reading and one
//! row with an extra field.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "generate_sample", about = "Write a synthetic time-series CSV")]
struct Args {
    /// Output file
    #[arg(default_value = "sample_data.csv")]
    output: PathBuf,

    /// Sampling rate in Hz
    #[arg(long, default_value = "1000")]
    rate: f64,

    /// Duration in seconds
    #[arg(long, default_value = "20")]
    seconds: f64,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Standard normal sample (Box-Muller).
fn gauss<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let n = (args.rate * args.seconds).round() as usize;
    let dt = 1.0 / args.rate;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut buf = BufWriter::new(file);

    writeln!(buf, "% PRISM synthetic recording")?;
    writeln!(buf, "% sampling_rate_hz: {}", args.rate)?;
    writeln!(buf, "# seed: {}", args.seed)?;
    writeln!(buf, "[channels]")?;
    writeln!(buf, "; ch1 = 5 Hz tone; ch2 = 12 Hz + 50 Hz tones; ch3 = red noise")?;

    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(buf);
    out.write_record(["time", "ch1", "ch2", "ch3"])?;

    let mut red = 0.0;
    for i in 0..n {
        let t = i as f64 * dt;
        let ch1 = (2.0 * PI * 5.0 * t).sin() + 0.3 * gauss(&mut rng);
        let ch2 = 0.8 * (2.0 * PI * 12.0 * t).sin()
            + 0.5 * (2.0 * PI * 50.0 * t).sin()
            + 0.2 * gauss(&mut rng);
        red = 0.98 * red + 0.1 * gauss(&mut rng);

        let mut cells = vec![
            format!("{t:.6}"),
            format!("{ch1:.6}"),
            format!("{ch2:.6}"),
            format!("{red:.6}"),
        ];
        if i == n / 3 {
            cells[1] = "n/a".to_string();
        } else if i == n / 2 {
            cells.push("overflow".to_string());
        }
        out.write_record(&cells)?;

        if i > 0 && i % 5000 == 0 {
            out.write_record([format!("% marker {}", i / 5000)])?;
        }
    }
    out.flush().context("flushing output")?;

    println!(
        "Wrote {n} rows at {} Hz to {}",
        args.rate,
        args.output.display()
    );
    Ok(())
}
