//! Beat-snap quantization toward a uniform grid
//!
//! A non-resampling nudge: around each interior beat, a window one beat
//! long is shifted toward where a perfectly even grid would put the beat
//! and averaged with itself. Nothing between windows is stretched, so
//! window edges can click; first and last beats stay anchored.

use crate::model::AudioBuffer;

/// Median inter-beat spacing in samples (truncated), or `None` with < 2 beats
pub fn target_interval(beats: &[usize]) -> Option<usize> {
    if beats.len() < 2 {
        return None;
    }

    let mut diffs: Vec<i64> = beats
        .windows(2)
        .map(|w| w[1] as i64 - w[0] as i64)
        .collect();
    diffs.sort_unstable();

    let mid = diffs.len() / 2;
    let median = if diffs.len() % 2 == 0 {
        (diffs[mid - 1] + diffs[mid]) as f64 / 2.0
    } else {
        diffs[mid] as f64
    };

    Some(median.max(0.0) as usize)
}

/// Nudge audio around interior beats toward the median-spaced grid
///
/// `beats` are sample-frame positions, `strength` in `[0, 1]` scales the
/// correction (0 leaves the buffer untouched, 1 moves fully onto the grid).
/// Returns a buffer of the same length and rate.
pub fn quantize(buffer: &AudioBuffer, beats: &[usize], strength: f64) -> AudioBuffer {
    let Some(target) = target_interval(beats) else {
        log::info!("Fewer than 2 beats, quantization leaves the audio unchanged");
        return buffer.clone();
    };

    let mut out = buffer.samples().to_vec();
    let half = target / 2;
    let mut nudged = 0usize;

    for (i, &current) in beats.iter().enumerate().take(beats.len() - 1).skip(1) {
        let ideal = beats[0] as i64 + (i * target) as i64;
        let shift = ((ideal - current as i64) as f64 * strength).round() as i64;
        if shift == 0 {
            continue;
        }

        let start = current.saturating_sub(half);
        let end = (current + half).min(out.len());
        if start >= end {
            continue;
        }

        blend_shifted(&mut out[start..end], shift);
        nudged += 1;

        log::debug!("Beat {} at {}: shift {} samples over [{}, {})", i, current, shift, start, end);
    }

    log::info!(
        "Quantized {} of {} interior beat(s) toward a {}-sample grid",
        nudged,
        beats.len().saturating_sub(2),
        target
    );

    buffer.with_samples(out)
}

/// Replace `window` with the average of itself and a copy delayed by `shift`
///
/// Positive shifts delay (zeros enter at the front), negative shifts
/// advance (zeros enter at the back).
fn blend_shifted(window: &mut [f32], shift: i64) {
    let shifted = shift_window(window, shift);
    for (sample, moved) in window.iter_mut().zip(shifted) {
        *sample = 0.5 * *sample + 0.5 * moved;
    }
}

fn shift_window(window: &[f32], shift: i64) -> Vec<f32> {
    let len = window.len() as i64;
    (0..len)
        .map(|k| {
            let source = k - shift;
            if (0..len).contains(&source) {
                window[source as usize]
            } else {
                0.0
            }
        })
        .collect()
}
