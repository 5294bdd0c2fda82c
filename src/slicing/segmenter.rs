//! Bar-aligned loop segmentation
//!
//! Beats are grouped `BEATS_PER_BAR * bars` at a time. Each group becomes
//! one loop spanning from its first beat to the first beat of the next
//! group. Group starts follow `0, step, 2*step, ...` while the start is
//! below `beats.len() - step`, so any beats after the last full group are
//! not exported on their own.

use super::crossfade::{apply_crossfade, crossfade_samples};
use crate::model::{AudioBuffer, Loop};

/// Beats in one bar (constant 4/4 meter)
pub const BEATS_PER_BAR: usize = 4;

/// Time span of one loop, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopWindow {
    /// Loop ordinal
    pub index: usize,
    /// Index of the group's first beat
    pub first_beat: usize,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Compute loop windows for a beat sequence
///
/// `bars_per_loop` must be at least 1 (validated by the caller's config).
pub fn bar_windows(beats: &[f64], bars_per_loop: usize) -> Vec<LoopWindow> {
    let step = match BEATS_PER_BAR.checked_mul(bars_per_loop.max(1)) {
        Some(step) if step < beats.len() => step,
        _ => return Vec::new(),
    };

    let last = beats[beats.len() - 1];
    (0..beats.len() - step)
        .step_by(step)
        .enumerate()
        .map(|(index, i)| LoopWindow {
            index,
            first_beat: i,
            start_secs: beats[i],
            end_secs: beats.get(i + step).copied().unwrap_or(last),
        })
        .collect()
}

/// Cut `buffer` into crossfaded loops along the beat grid
pub fn slice_loops(
    buffer: &AudioBuffer,
    beats: &[f64],
    bars_per_loop: usize,
    crossfade_secs: f64,
) -> Vec<Loop> {
    let cf = crossfade_samples(crossfade_secs, buffer.sample_rate());
    let windows = bar_windows(beats, bars_per_loop);

    log::debug!(
        "Segmenting {} beats into {} loop(s) of {} bar(s), crossfade {} samples",
        beats.len(),
        windows.len(),
        bars_per_loop,
        cf
    );

    windows
        .into_iter()
        .map(|window| cut_loop(buffer, &window, cf))
        .collect()
}

/// Extract one window and fade its edges
fn cut_loop(buffer: &AudioBuffer, window: &LoopWindow, cf: usize) -> Loop {
    let start = buffer.sample_at(window.start_secs);
    let end = buffer.sample_at(window.end_secs).max(start);

    if start == end {
        log::warn!(
            "Loop {} is empty ({:.3}s-{:.3}s lies outside the audio)",
            window.index,
            window.start_secs,
            window.end_secs
        );
    }

    let samples = apply_crossfade(buffer.samples()[start..end].to_vec(), cf);

    Loop {
        index: window.index,
        start_sample: start,
        end_sample: end,
        samples,
        sample_rate: buffer.sample_rate(),
    }
}
