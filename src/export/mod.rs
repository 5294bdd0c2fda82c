//! Command orchestration and output organization

pub mod config;
pub mod organizer;
pub mod pipeline;

pub use config::{AnalyzeConfig, ConfigError, EstimatorConfig, QuantizeConfig, SliceConfig};
pub use organizer::{collect_audio_files, OutputOrganizer};
pub use pipeline::{GroovePipeline, QuantizeOutcome, SliceOutcome};
