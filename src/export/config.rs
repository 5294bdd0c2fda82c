//! Command configuration and validation

use crate::audio::OutputFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Default crossfade at loop edges (5 ms)
pub const DEFAULT_CROSSFADE_SECS: f64 = 0.005;

/// Default quantization strength
pub const DEFAULT_STRENGTH: f64 = 0.5;

/// Configuration rejected before any audio is processed
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Bars per loop must be at least 1 (got {0})")]
    InvalidBars(usize),

    #[error("Crossfade must be a finite, non-negative number of seconds (got {0})")]
    InvalidCrossfade(f64),

    #[error("Quantization strength must be within [0, 1] (got {0})")]
    InvalidStrength(f64),

    #[error("Invalid BPM range {min}-{max}")]
    InvalidBpmRange { min: f64, max: f64 },

    #[error("Tempo must be a positive number of BPM (got {0})")]
    InvalidTempo(f64),
}

/// Configuration for slicing audio into loops
#[derive(Debug, Clone)]
pub struct SliceConfig {
    /// Directory receiving loop_NNNN.wav files
    pub out_dir: PathBuf,

    /// Bars per exported loop (4 beats per bar)
    pub bars_per_loop: usize,

    /// Edge crossfade in seconds
    pub crossfade_secs: f64,

    /// Also write click.mid
    pub midi_click: bool,

    /// Also write an HTML report into the output directory
    pub report: bool,

    /// Sample encoding of written loops
    pub output_format: OutputFormat,
}

impl SliceConfig {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            bars_per_loop: 1,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            midi_click: false,
            report: false,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_bars(mut self, bars: usize) -> Self {
        self.bars_per_loop = bars;
        self
    }

    pub fn with_crossfade(mut self, seconds: f64) -> Self {
        self.crossfade_secs = seconds;
        self
    }

    pub fn with_midi_click(mut self, enable: bool) -> Self {
        self.midi_click = enable;
        self
    }

    pub fn with_report(mut self, enable: bool) -> Self {
        self.report = enable;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bars_per_loop == 0 {
            return Err(ConfigError::InvalidBars(self.bars_per_loop));
        }
        if !self.crossfade_secs.is_finite() || self.crossfade_secs < 0.0 {
            return Err(ConfigError::InvalidCrossfade(self.crossfade_secs));
        }
        Ok(())
    }
}

/// Configuration for grid quantization
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Output WAV path
    pub out_path: PathBuf,

    /// Correction strength in [0, 1]
    pub strength: f64,

    /// Sample encoding of the written file
    pub output_format: OutputFormat,
}

impl QuantizeConfig {
    pub fn new(out_path: PathBuf) -> Self {
        Self {
            out_path,
            strength: DEFAULT_STRENGTH,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ConfigError::InvalidStrength(self.strength));
        }
        Ok(())
    }
}

/// Configuration for analysis (and optional reports)
#[derive(Debug, Clone, Default)]
pub struct AnalyzeConfig {
    /// Directory receiving `<stem>_groove.html` reports (None = no report)
    pub report_dir: Option<PathBuf>,
}

impl AnalyzeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(mut self, report_dir: PathBuf) -> Self {
        self.report_dir = Some(report_dir);
        self
    }
}

/// Beat estimator selection
#[derive(Debug, Clone, Default)]
pub struct EstimatorConfig {
    /// Replay beats from this file instead of detecting them
    pub beats_file: Option<PathBuf>,

    /// Tempo to pair with a beats file
    pub tempo: Option<f64>,

    /// Tempo folding range for detection (0 disables)
    pub min_bpm: f64,
    pub max_bpm: f64,
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_bpm, self.max_bpm);
        let disabled = min == 0.0 && max == 0.0;
        if !disabled && !(min > 0.0 && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidBpmRange { min, max });
        }
        if let Some(tempo) = self.tempo {
            if !tempo.is_finite() || tempo <= 0.0 {
                return Err(ConfigError::InvalidTempo(tempo));
            }
        }
        Ok(())
    }
}
