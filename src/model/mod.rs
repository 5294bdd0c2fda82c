//! Data model shared by every stage of the pipeline
//!
//! These types are independent of both the decoder used to load audio
//! and the formats written by the exporters.

mod audio;
mod beats;
mod segment;
mod source;

pub use audio::AudioBuffer;
pub use beats::{BeatTrack, BeatTrackError};
pub use segment::Loop;
pub use source::SourceInfo;
