use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::PathBuf;

use prism::{
    analysis::psd::segment_length, estimate_autocorrelation, estimate_psd, load_file,
    AnalysisConfig, AnalysisSession, IngestError,
};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Logger-style recording: preamble, header, a 20 Hz tone on `ch1` and a
/// 5 Hz tone on `ch2` at 200 Hz, plus a few broken rows.
fn recording(rows: usize) -> String {
    let fs = 200.0;
    let mut text = String::new();
    text.push_str("% Instrument: bench logger\n");
    text.push_str("% Operator: test\n");
    text.push_str("# exported 2024-05-01\n");
    text.push_str("time,ch1,ch2\n");
    for i in 0..rows {
        let t = i as f64 / fs;
        let ch1 = (2.0 * PI * 20.0 * t).sin();
        let ch2 = 0.5 * (2.0 * PI * 5.0 * t).cos();
        writeln!(text, "{t},{ch1},{ch2}").unwrap();
        if i == 100 {
            text.push_str("% gain changed\n");
            text.push_str(&format!("{t},ERR,{ch2}\n"));
            text.push_str("1.0,2.0\n");
        }
    }
    text
}

#[test]
fn test_spec_example_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "example.csv",
        "% a\n% b\n% c\nt,ch1,ch2\n0.0,1.0,2.0\n0.01,1.5,2.5\n",
    );
    let loaded = load_file(&path).unwrap();
    assert_eq!(loaded.table.len(), 2);
    assert_eq!(loaded.table.num_columns(), 3);
    assert!((loaded.sampling_rate - 100.0).abs() < 1e-9);
}

#[test]
fn test_full_pipeline_finds_tones() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "rec.csv", &recording(8000));

    let loaded = load_file(&path).unwrap();
    assert_eq!(loaded.header_line, 3);
    assert_eq!(loaded.table.len(), 8000);
    assert!((loaded.sampling_rate - 200.0).abs() < 1e-6);

    let ch1 = &loaded.table.channel(0).unwrap().values;
    let spectrum = estimate_psd(ch1, loaded.sampling_rate, 10);
    assert_eq!(spectrum.segment_length, segment_length(8000, 10));
    let (peak, _) = spectrum.peak().unwrap();
    assert!((peak - 20.0).abs() <= spectrum.resolution());

    let ch2 = &loaded.table.channel(1).unwrap().values;
    let acf = estimate_autocorrelation(ch2, 100);
    assert_eq!(acf.len(), 100);
    assert_eq!(acf.coefficients[0], 1.0);
    // 5 Hz at 200 Hz repeats every 40 samples.
    assert!(acf.coefficients[40] > 0.9);
}

#[test]
fn test_every_row_bad_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "bad.csv", "t,a,b\n0,1,x\n1,?,2\nq,3,4\n");
    assert!(matches!(
        load_file(&path),
        Err(IngestError::NoUsableRows { rows: 0 })
    ));
}

#[test]
fn test_session_flow() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "rec.csv", &recording(3000));

    let mut session = AnalysisSession::new(AnalysisConfig {
        max_lag: 64,
        ..AnalysisConfig::default()
    });
    assert!(session.open_file(&path));
    assert_eq!(session.channel_names(), vec!["ch1", "ch2"]);

    session.set_smoothing_level(1);
    let fine = session.spectrum();
    session.set_smoothing_level(10);
    let coarse = session.spectrum();
    assert!(fine.segment_length >= coarse.segment_length);
    assert_eq!(coarse, session.spectrum());

    assert!(session.select_channel(1));
    let acf = session.correlogram();
    assert_eq!(acf.len(), 64);
    assert!(acf.coefficients.iter().all(|c| (-1.0..=1.0).contains(c)));

    let broken = write_file(&dir, "broken.csv", "t,a\n0,1\n");
    assert!(!session.open_file(&broken));
    assert!(session.dataset.is_none());
    assert!(session.spectrum().is_empty());
}

#[test]
fn test_zero_rate_gives_empty_spectrum() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = String::from("t,a\n");
    for i in 0..600 {
        writeln!(text, "0,{}", (i as f64 * 0.1).sin()).unwrap();
    }
    let path = write_file(&dir, "frozen.csv", &text);

    let loaded = load_file(&path).unwrap();
    assert_eq!(loaded.sampling_rate, 0.0);
    let ch = &loaded.table.channel(0).unwrap().values;
    assert!(estimate_psd(ch, loaded.sampling_rate, 3).is_empty());
    // Correlogram does not need the rate.
    assert_eq!(estimate_autocorrelation(ch, 10).len(), 10);
}
