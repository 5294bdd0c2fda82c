//! GrooveSlicer - beat-aware loop slicing
//!
//! This library decodes audio, estimates its beats, and turns them into
//! bar-aligned loop files, a MIDI click track, an HTML report, or a
//! grid-quantized copy of the audio.

pub mod analysis;
pub mod audio;
pub mod click;
pub mod export;
pub mod model;
pub mod quantize;
pub mod report;
pub mod slicing;
pub mod validation;

pub use export::config::{AnalyzeConfig, QuantizeConfig, SliceConfig};
pub use export::pipeline::GroovePipeline;
