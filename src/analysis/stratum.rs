//! Beat tracking using stratum-dsp
//!
//! stratum-dsp estimates the tempo and a beat grid from mono f32
//! samples. Its grid is sanitised into a [`BeatTrack`] here.

use super::traits::BeatEstimator;
use crate::model::{AudioBuffer, BeatTrack};
use anyhow::Result;
use stratum_dsp::{analyze_audio, AnalysisConfig};

/// Shortest input handed to stratum-dsp, in seconds
const MIN_ANALYSIS_SECS: f64 = 1.0;

/// Beat estimator backed by stratum-dsp
pub struct StratumEstimator {
    /// Minimum BPM for tempo folding (0 disables folding)
    min_bpm: f64,
    /// Maximum BPM for tempo folding (0 disables folding)
    max_bpm: f64,
}

impl StratumEstimator {
    pub fn new() -> Self {
        Self {
            min_bpm: 0.0,
            max_bpm: 0.0,
        }
    }

    /// Fold the reported tempo into `[min, max]` by doubling or halving
    pub fn with_bpm_range(mut self, min: f64, max: f64) -> Self {
        self.min_bpm = min;
        self.max_bpm = max;
        self
    }
}

impl Default for StratumEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatEstimator for StratumEstimator {
    fn estimate(&self, buffer: &AudioBuffer) -> Result<BeatTrack> {
        if buffer.duration_secs() < MIN_ANALYSIS_SECS {
            log::warn!(
                "Audio too short for beat tracking ({:.2}s), no beats detected",
                buffer.duration_secs()
            );
            return Ok(BeatTrack::empty());
        }

        let result = match analyze_audio(buffer.samples(), buffer.sample_rate(), AnalysisConfig::default()) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Beat tracking failed: {:?}", e);
                return Ok(BeatTrack::empty());
            }
        };

        let bpm = fold_bpm(result.bpm as f64, self.min_bpm, self.max_bpm);
        let raw: Vec<f64> = result.beat_grid.beats.iter().map(|&b| b as f64).collect();
        let beats = strictly_increasing(raw);

        if bpm <= 0.0 || beats.is_empty() {
            log::warn!("No usable beat grid (BPM={:.1}, beats={})", bpm, beats.len());
            return Ok(BeatTrack::empty());
        }

        log::info!("Beat tracking complete: BPM={:.1}, beats={}", bpm, beats.len());

        Ok(BeatTrack::new(bpm, beats)?)
    }
}

/// Keep only finite, non-negative beats that move strictly forward
fn strictly_increasing(raw: Vec<f64>) -> Vec<f64> {
    let mut beats: Vec<f64> = Vec::with_capacity(raw.len());
    for t in raw {
        if !t.is_finite() || t < 0.0 {
            continue;
        }
        if beats.last().map_or(true, |&prev| t > prev) {
            beats.push(t);
        } else {
            log::debug!("Dropping out-of-order beat at {:.4}s", t);
        }
    }
    beats
}

/// Move a tempo into `[min_bpm, max_bpm]` by whole octaves
///
/// A zero bound disables folding.
fn fold_bpm(bpm: f64, min_bpm: f64, max_bpm: f64) -> f64 {
    if min_bpm <= 0.0 || max_bpm <= 0.0 || bpm <= 0.0 {
        return bpm;
    }

    let mut folded = bpm;
    while folded < min_bpm && folded * 2.0 <= max_bpm {
        folded *= 2.0;
    }
    while folded > max_bpm && folded / 2.0 >= min_bpm {
        folded /= 2.0;
    }

    if folded != bpm {
        log::debug!("Folded {:.1} BPM to {:.1} ({}-{})", bpm, folded, min_bpm, max_bpm);
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_gives_empty_track() {
        let buffer = AudioBuffer::new(vec![0.0; 100], 44100).unwrap();
        let track = StratumEstimator::new().estimate(&buffer).unwrap();
        assert!(track.is_empty());
    }

    #[test]
    fn test_fold_bpm() {
        assert_eq!(fold_bpm(60.0, 70.0, 170.0), 120.0);
        assert_eq!(fold_bpm(200.0, 70.0, 170.0), 100.0);
        assert_eq!(fold_bpm(128.0, 70.0, 170.0), 128.0);
        // Disabled range leaves the tempo alone
        assert_eq!(fold_bpm(60.0, 0.0, 0.0), 60.0);
    }

    #[test]
    fn test_strictly_increasing_filters() {
        let beats = strictly_increasing(vec![0.5, 0.4, 1.0, 1.0, f64::NAN, -1.0, 1.5]);
        assert_eq!(beats, vec![0.5, 1.0, 1.5]);
    }
}
