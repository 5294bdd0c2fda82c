//! Linear edge fades for exported loops

/// Crossfade length in samples for a duration in seconds
pub fn crossfade_samples(duration_secs: f64, sample_rate: u32) -> usize {
    let samples = (duration_secs * sample_rate as f64).round();
    if samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Apply a `cf`-sample fade-in and fade-out to a loop
///
/// The ramp runs 0→1 inclusive over `cf` samples (a one-sample ramp is a
/// single 0), so the first and last samples of a faded loop are silent.
/// Loops of `2 * cf` samples or fewer are returned unmodified.
pub fn apply_crossfade(mut samples: Vec<f32>, cf: usize) -> Vec<f32> {
    let len = samples.len();
    if cf == 0 || len <= cf.saturating_mul(2) {
        return samples;
    }

    let ramp = linear_ramp(cf);
    for (sample, gain) in samples[..cf].iter_mut().zip(ramp.iter()) {
        *sample *= gain;
    }
    for (sample, gain) in samples[len - cf..].iter_mut().zip(ramp.iter().rev()) {
        *sample *= gain;
    }

    samples
}

/// `n` evenly spaced gains from 0.0 to 1.0 inclusive
fn linear_ramp(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![0.0];
    }
    let last = (n - 1) as f64;
    (0..n).map(|k| (k as f64 / last) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossfade_samples_rounds() {
        assert_eq!(crossfade_samples(0.005, 44100), 221); // 220.5 rounds up
        assert_eq!(crossfade_samples(0.0, 44100), 0);
        assert_eq!(crossfade_samples(-1.0, 44100), 0);
    }

    #[test]
    fn test_edges_are_silent() {
        let faded = apply_crossfade(vec![1.0; 100], 10);
        assert_eq!(faded[0], 0.0);
        assert_eq!(faded[99], 0.0);
        assert_eq!(faded[9], 1.0);
        assert_eq!(faded[90], 1.0);
        assert!(faded[10..90].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_ramps_are_linear_and_monotonic() {
        let faded = apply_crossfade(vec![1.0; 50], 11);
        for k in 0..11 {
            assert!((faded[k] - k as f32 / 10.0).abs() < 1e-6);
            assert!((faded[49 - k] - k as f32 / 10.0).abs() < 1e-6);
        }
        assert!(faded[..11].windows(2).all(|w| w[0] <= w[1]));
        assert!(faded[39..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_huge_crossfade_leaves_loop_untouched() {
        let cf = crossfade_samples(1e18, 44100);
        assert_eq!(cf, usize::MAX);
        let original = vec![0.5; 64];
        assert_eq!(apply_crossfade(original.clone(), cf), original);
        assert_eq!(apply_crossfade(original.clone(), usize::MAX / 2 + 1), original);
    }

    #[test]
    fn test_short_loop_is_untouched() {
        let original: Vec<f32> = (0..20).map(|i| i as f32 * 0.01).collect();
        assert_eq!(apply_crossfade(original.clone(), 10), original);
        assert_eq!(apply_crossfade(original.clone(), 15), original);
    }

    #[test]
    fn test_zero_crossfade_is_identity() {
        let original = vec![0.3; 8];
        assert_eq!(apply_crossfade(original.clone(), 0), original);
    }

    #[test]
    fn test_single_sample_ramp() {
        let faded = apply_crossfade(vec![1.0; 4], 1);
        assert_eq!(faded, vec![0.0, 1.0, 1.0, 0.0]);
    }
}
