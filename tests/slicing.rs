mod common;

use common::{click_fixture, SAMPLE_RATE};
use grooveslicer::analysis::FixedBeatsEstimator;
use grooveslicer::audio::{load_mono, OutputFormat};
use grooveslicer::validation::validate_slices;
use grooveslicer::{AnalyzeConfig, GroovePipeline, QuantizeConfig, SliceConfig};
use tempfile::TempDir;

fn grid(count: usize) -> GroovePipeline<FixedBeatsEstimator> {
    GroovePipeline::new(FixedBeatsEstimator::uniform(0.0, 0.5, count))
}

#[test]
fn test_slice_full_grid_into_one_bar_loops() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let config = SliceConfig::new(out.clone()).with_crossfade(0.0);
    let outcome = grid(21).slice(&input, &config).unwrap();

    assert_eq!(outcome.loops_exported(), 5);
    assert!(outcome.loop_lengths.iter().all(|&len| len == 88200));
    assert!((outcome.tempo_bpm - 120.0).abs() < 1e-9);
    assert_eq!(outcome.beats, 21);
    assert!(out.join("loop_0000.wav").exists());
    assert!(out.join("loop_0004.wav").exists());
    assert!(!out.join("loop_0005.wav").exists());

    let report = validate_slices(&out).unwrap();
    assert_eq!(report.loops, 5);
    assert_eq!(report.sample_rate, Some(SAMPLE_RATE));
    assert_eq!(report.click_pulses, None);
}

#[test]
fn test_trailing_group_is_dropped() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let config = SliceConfig::new(out).with_crossfade(0.0);
    let outcome = grid(20).slice(&input, &config).unwrap();

    assert_eq!(outcome.loop_lengths, vec![88200; 4]);
}

#[test]
fn test_two_bar_loops_with_click_track() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let config = SliceConfig::new(out.clone())
        .with_bars(2)
        .with_midi_click(true)
        .with_output_format(OutputFormat::Float32);
    let outcome = grid(21).slice(&input, &config).unwrap();

    // starts at beats 0 and 8; beat 16 has no full group after it
    assert_eq!(outcome.loop_lengths, vec![176400, 176400]);
    assert_eq!(outcome.click_path, Some(out.join("click.mid")));

    let report = validate_slices(&out).unwrap();
    assert_eq!(report.loops, 2);
    assert_eq!(report.click_pulses, Some(21));
    assert_eq!(report.click_tempo, Some(500_000));
}

#[test]
fn test_crossfaded_loop_edges_are_silent() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let config = SliceConfig::new(out.clone()).with_output_format(OutputFormat::Float32);
    grid(21).slice(&input, &config).unwrap();

    let first = load_mono(&out.join("loop_0000.wav")).unwrap();
    assert_eq!(first.len(), 88200);
    assert_eq!(first.samples()[0], 0.0);
    assert_eq!(first.samples()[first.len() - 1], 0.0);
}

#[test]
fn test_too_few_beats_exports_nothing() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let outcome = grid(4).slice(&input, &SliceConfig::new(out.clone())).unwrap();
    assert_eq!(outcome.loops_exported(), 0);
    assert!(out.is_dir());
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("slices");

    let result = grid(21).slice(&dir.path().join("missing.wav"), &SliceConfig::new(out.clone()));
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn test_truncated_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    std::fs::OpenOptions::new()
        .write(true)
        .open(&input)
        .unwrap()
        .set_len(44)
        .unwrap();

    let out = dir.path().join("slices");
    assert!(grid(21).slice(&input, &SliceConfig::new(out.clone())).is_err());
    assert!(!out.exists());

    let quantized = dir.path().join("quantized.wav");
    assert!(grid(21).quantize(&input, &QuantizeConfig::new(quantized.clone())).is_err());
    assert!(!quantized.exists());
}

#[test]
fn test_oversized_bars_and_crossfade_are_narrowed() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());

    let config = SliceConfig::new(dir.path().join("wide")).with_bars(usize::MAX / 2);
    assert_eq!(grid(21).slice(&input, &config).unwrap().loops_exported(), 0);

    let config = SliceConfig::new(dir.path().join("faded")).with_crossfade(1e18);
    let outcome = grid(21).slice(&input, &config).unwrap();
    assert_eq!(outcome.loop_lengths, vec![88200; 5]);
}

#[test]
fn test_invalid_config_is_rejected_before_loading() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("slices");

    let config = SliceConfig::new(out.clone()).with_bars(0);
    assert!(grid(21).slice(&input, &config).is_err());
    assert!(!out.exists());
}

#[test]
fn test_quantize_with_zero_strength_is_identity() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("nested").join("quantized.wav");

    let config = QuantizeConfig::new(out.clone())
        .with_strength(0.0)
        .with_output_format(OutputFormat::Float32);
    let outcome = grid(21).quantize(&input, &config).unwrap();
    assert_eq!(outcome.beats, 21);

    let original = load_mono(&input).unwrap();
    let quantized = load_mono(&out).unwrap();
    assert_eq!(quantized.sample_rate(), original.sample_rate());
    assert_eq!(quantized.samples(), original.samples());
}

#[test]
fn test_quantize_keeps_length() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let out = dir.path().join("quantized.wav");

    // Irregular grid so the quantizer has something to move
    let pipeline = GroovePipeline::new(
        FixedBeatsEstimator::new(vec![0.0, 0.48, 1.03, 1.5, 2.0]).with_tempo(120.0),
    );
    let outcome = pipeline.quantize(&input, &QuantizeConfig::new(out.clone())).unwrap();

    assert_eq!(outcome.samples, 441000);
    assert_eq!(load_mono(&out).unwrap().len(), 441000);
}

#[test]
fn test_analyze_writes_report() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let reports = dir.path().join("reports");

    let config = AnalyzeConfig::new().with_reports(reports.clone());
    let summary = grid(21).analyze(&input, &config).unwrap();

    assert_eq!(summary.file, "click.wav");
    assert_eq!(summary.beats, 21);
    assert_eq!(summary.line(), "BPM: 120.00, beats: 21");
    assert_eq!(summary.sample_rate, SAMPLE_RATE);

    let html = std::fs::read_to_string(reports.join("click_groove.html")).unwrap();
    assert!(html.contains("Estimated BPM: 120.00"));
    assert!(html.contains("data:image/png;base64,"));
}

#[test]
fn test_analyze_batch_keeps_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let input = click_fixture(dir.path());
    let missing = dir.path().join("missing.wav");

    let results = grid(21).analyze_batch(&[input.clone(), missing.clone()], &AnalyzeConfig::new());

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, input);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, missing);
    assert!(results[1].1.is_err());
}
