//! Beat-synchronous slicing into loops

mod crossfade;
mod segmenter;

pub use crossfade::{apply_crossfade, crossfade_samples};
pub use segmenter::{bar_windows, slice_loops, LoopWindow, BEATS_PER_BAR};
