use thiserror::Error;

/// Reasons a beat sequence cannot form a [`BeatTrack`]
#[derive(Debug, Error, PartialEq)]
pub enum BeatTrackError {
    #[error("Beat {index} is not a finite, non-negative time: {value}")]
    InvalidPosition { index: usize, value: f64 },

    #[error("Beat {index} ({value:.4}s) does not come after the previous beat")]
    NotIncreasing { index: usize, value: f64 },

    #[error("Invalid tempo {0} for a non-empty beat track")]
    InvalidTempo(f64),
}

/// Estimated tempo plus ordered beat positions
#[derive(Debug, Clone, PartialEq)]
pub struct BeatTrack {
    /// Tempo in beats per minute (0.0 only when no beats were found)
    tempo_bpm: f64,

    /// Beat times in seconds, strictly increasing
    beats: Vec<f64>,
}

impl BeatTrack {
    /// Build a track, checking that the beats are strictly increasing
    pub fn new(tempo_bpm: f64, beats: Vec<f64>) -> Result<Self, BeatTrackError> {
        for (index, &value) in beats.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(BeatTrackError::InvalidPosition { index, value });
            }
            if index > 0 && value <= beats[index - 1] {
                return Err(BeatTrackError::NotIncreasing { index, value });
            }
        }

        if !tempo_bpm.is_finite() || tempo_bpm < 0.0 || (!beats.is_empty() && tempo_bpm == 0.0) {
            return Err(BeatTrackError::InvalidTempo(tempo_bpm));
        }

        Ok(Self { tempo_bpm, beats })
    }

    /// Track with no beats and an undetected tempo
    pub fn empty() -> Self {
        Self {
            tempo_bpm: 0.0,
            beats: Vec::new(),
        }
    }

    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    /// Beat positions in seconds
    pub fn times(&self) -> &[f64] {
        &self.beats
    }

    /// Beat positions as sample-frame indices at the given rate
    pub fn sample_frames(&self, sample_rate: u32) -> Vec<usize> {
        self.beats
            .iter()
            .map(|&t| (t * sample_rate as f64).round() as usize)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }
}
