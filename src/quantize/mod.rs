//! Grid quantization of beat-adjacent audio

mod grid;

pub use grid::{quantize, target_interval};
