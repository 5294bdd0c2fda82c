//! Beat estimator trait and analysis summary types

use crate::model::{AudioBuffer, BeatTrack};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Beat estimator trait - allows swapping the tracker behind the pipeline
///
/// Implementations return an empty [`BeatTrack`] when nothing can be
/// detected (silence, very short input) rather than an error. Errors are
/// reserved for genuinely broken input.
pub trait BeatEstimator: Send + Sync {
    /// Estimate tempo and beat positions for a mono buffer
    fn estimate(&self, buffer: &AudioBuffer) -> Result<BeatTrack>;
}

/// Summary of one analysed file, printed by `analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Source file name
    pub file: String,

    /// Estimated tempo in BPM
    pub bpm: f64,

    /// Number of detected beats
    pub beats: usize,

    /// Decoded duration in seconds
    pub duration_secs: f64,

    /// Native sample rate in Hz
    pub sample_rate: u32,
}

impl AnalysisSummary {
    pub fn new(file: String, buffer: &AudioBuffer, track: &BeatTrack) -> Self {
        Self {
            file,
            bpm: track.tempo_bpm(),
            beats: track.len(),
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
        }
    }

    /// One-line human readable form
    pub fn line(&self) -> String {
        format!("BPM: {:.2}, beats: {}", self.bpm, self.beats)
    }
}
