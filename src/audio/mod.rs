//! Audio file I/O
//!
//! Decoding goes through symphonia (any supported container, collapsed
//! to mono); writing produces mono WAV through hound.

mod decode;
mod tags;
mod wav;

pub use decode::load_mono;
pub use tags::read_source_info;
pub use wav::{write_wav, OutputFormat};
