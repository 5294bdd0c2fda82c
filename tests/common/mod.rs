//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};

pub const SAMPLE_RATE: u32 = 44100;

/// Write a mono 16-bit click track: a short decaying burst every `interval` seconds
pub fn write_click_wav(path: &Path, duration_secs: f64, interval_secs: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let total = (duration_secs * SAMPLE_RATE as f64).round() as usize;
    let period = (interval_secs * SAMPLE_RATE as f64).round() as usize;
    let burst = 441;

    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..total {
        let phase = i % period;
        let value = if phase < burst {
            let decay = 1.0 - phase as f64 / burst as f64;
            let tone = (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / SAMPLE_RATE as f64).sin();
            tone * decay * 0.8
        } else {
            0.0
        };
        writer.write_sample((value * i16::MAX as f64) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// A 10 s click at 120 BPM in `dir`
pub fn click_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("click.wav");
    write_click_wav(&path, 10.0, 0.5);
    path
}
