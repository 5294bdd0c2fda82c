//! Estimator that replays a known beat grid
//!
//! Skips detection entirely. Used to re-slice audio against a grid made
//! elsewhere, and to drive the pipeline deterministically in tests.

use super::traits::BeatEstimator;
use crate::model::{AudioBuffer, BeatTrack};
use anyhow::{Context, Result};
use std::path::Path;

/// Estimator returning a fixed set of beat times
#[derive(Debug, Clone)]
pub struct FixedBeatsEstimator {
    /// Tempo override; derived from the beat spacing when absent
    tempo_bpm: Option<f64>,
    /// Beat times in seconds
    beats: Vec<f64>,
}

impl FixedBeatsEstimator {
    pub fn new(beats: Vec<f64>) -> Self {
        Self {
            tempo_bpm: None,
            beats,
        }
    }

    /// Evenly spaced beats: `count` beats every `interval_secs`, starting at `offset_secs`
    pub fn uniform(offset_secs: f64, interval_secs: f64, count: usize) -> Self {
        let beats = (0..count)
            .map(|i| offset_secs + i as f64 * interval_secs)
            .collect();
        Self::new(beats)
    }

    /// Read beat times (seconds) from a text file
    ///
    /// Accepts one value per line or comma-separated values. Blank lines
    /// and `#` comments are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read beats file: {:?}", path))?;
        let beats = parse_beat_list(&text)
            .with_context(|| format!("Invalid beats file: {:?}", path))?;

        log::info!("Loaded {} beats from {:?}", beats.len(), path);
        Ok(Self::new(beats))
    }

    /// Use a fixed tempo instead of deriving one
    pub fn with_tempo(mut self, tempo_bpm: f64) -> Self {
        self.tempo_bpm = Some(tempo_bpm);
        self
    }
}

impl BeatEstimator for FixedBeatsEstimator {
    fn estimate(&self, buffer: &AudioBuffer) -> Result<BeatTrack> {
        log::debug!(
            "Using fixed beat grid ({} beats) for {:.1}s of audio",
            self.beats.len(),
            buffer.duration_secs()
        );

        if self.beats.is_empty() {
            return Ok(BeatTrack::empty());
        }

        let tempo = self
            .tempo_bpm
            .unwrap_or_else(|| tempo_from_spacing(&self.beats));

        // A single beat has no spacing to derive a tempo from
        if tempo <= 0.0 {
            log::warn!("Cannot derive a tempo from a single beat; pass a tempo to keep it");
            return Ok(BeatTrack::empty());
        }

        Ok(BeatTrack::new(tempo, self.beats.clone())?)
    }
}

/// Parse newline/comma separated beat times, skipping comments
fn parse_beat_list(text: &str) -> Result<Vec<f64>> {
    let mut beats = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for field in line.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let value: f64 = field
                .parse()
                .with_context(|| format!("Line {}: not a number: {:?}", line_no + 1, field))?;
            beats.push(value);
        }
    }
    Ok(beats)
}

/// `60 / median(inter-beat interval)`, or 0.0 with fewer than two beats
fn tempo_from_spacing(beats: &[f64]) -> f64 {
    let mut intervals: Vec<f64> = beats.windows(2).map(|w| w[1] - w[0]).collect();
    if intervals.is_empty() {
        return 0.0;
    }
    intervals.sort_by(|a, b| a.total_cmp(b));

    let mid = intervals.len() / 2;
    let median = if intervals.len() % 2 == 0 {
        (intervals[mid - 1] + intervals[mid]) / 2.0
    } else {
        intervals[mid]
    };

    if median > 0.0 {
        60.0 / median
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> AudioBuffer {
        AudioBuffer::new(vec![0.0; 44100], 44100).unwrap()
    }

    #[test]
    fn test_tempo_derived_from_spacing() {
        let track = FixedBeatsEstimator::uniform(0.0, 0.5, 8)
            .estimate(&buffer())
            .unwrap();
        assert_eq!(track.len(), 8);
        assert!((track.tempo_bpm() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_tempo_override() {
        let track = FixedBeatsEstimator::uniform(0.0, 0.5, 4)
            .with_tempo(90.0)
            .estimate(&buffer())
            .unwrap();
        assert_eq!(track.tempo_bpm(), 90.0);
    }

    #[test]
    fn test_empty_grid() {
        let track = FixedBeatsEstimator::new(Vec::new()).estimate(&buffer()).unwrap();
        assert!(track.is_empty());
    }

    #[test]
    fn test_unordered_grid_is_error() {
        let result = FixedBeatsEstimator::new(vec![1.0, 0.5])
            .with_tempo(120.0)
            .estimate(&buffer());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_beat_list() {
        let beats = parse_beat_list("# beats\n0.0, 0.5\n\n1.0\n1.5,2.0\n").unwrap();
        assert_eq!(beats, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(parse_beat_list("0.0\nabc\n").is_err());
    }
}
