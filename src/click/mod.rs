//! MIDI click track generation

mod midi;

pub use midi::{ClickTrack, ACCENT_PERIOD, ACCENT_VELOCITY, CLICK_NOTE, CLICK_PPQ, NORMAL_VELOCITY};
