//! Waveform envelope extraction for report plots
//!
//! Reduces a buffer to a fixed number of columns, each holding the
//! minimum and maximum sample it covers, plus whole-buffer levels.

use crate::model::AudioBuffer;

/// Min/max envelope of one plot column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub min: f32,
    pub max: f32,
}

/// Overall signal levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub rms: f32,
    pub peak: f32,
}

/// Reduce `buffer` to `columns` min/max pairs
///
/// Buffers shorter than the column count give one column per sample.
pub fn envelope(buffer: &AudioBuffer, columns: usize) -> Vec<Column> {
    let samples = buffer.samples();
    if samples.is_empty() || columns == 0 {
        return Vec::new();
    }

    let columns = columns.min(samples.len());
    let mut result = Vec::with_capacity(columns);

    for col in 0..columns {
        let start = col * samples.len() / columns;
        let end = ((col + 1) * samples.len() / columns).min(samples.len());
        let chunk = &samples[start..end.max(start + 1)];

        let (min, max) = chunk
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        result.push(Column { min, max });
    }

    let loudest = result.iter().map(|c| c.max.max(-c.min)).fold(0.0f32, f32::max);
    log::debug!("Envelope: {} columns, peak {:.4}", result.len(), loudest);

    result
}

/// RMS and peak of the whole buffer
pub fn levels(buffer: &AudioBuffer) -> Levels {
    levels_of(buffer.samples())
}

fn levels_of(samples: &[f32]) -> Levels {
    if samples.is_empty() {
        return Levels { rms: 0.0, peak: 0.0 };
    }

    let (energy, peak) = samples.iter().fold((0.0f64, 0.0f32), |(energy, peak), &s| {
        (energy + f64::from(s).powi(2), peak.max(s.abs()))
    });

    Levels {
        rms: (energy / samples.len() as f64).sqrt() as f32,
        peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let signal = levels_of(&[0.0, 0.5, -0.5, 0.25, -0.25]);
        assert_eq!(signal.peak, 0.5);
        // sqrt((0.25 + 0.25 + 0.0625 + 0.0625) / 5)
        assert!((signal.rms - 0.125f32.sqrt()).abs() < 1e-6);

        assert_eq!(levels_of(&[]), Levels { rms: 0.0, peak: 0.0 });
        assert_eq!(levels_of(&[-0.8]).peak, 0.8);
    }

    #[test]
    fn test_envelope_columns() {
        let samples: Vec<f32> = (0..1000).map(|i| if i % 2 == 0 { 0.5 } else { -0.25 }).collect();
        let buffer = AudioBuffer::new(samples, 1000).unwrap();
        let columns = envelope(&buffer, 10);
        assert_eq!(columns.len(), 10);
        for c in columns {
            assert_eq!(c.max, 0.5);
            assert_eq!(c.min, -0.25);
        }
    }

    #[test]
    fn test_envelope_short_buffer() {
        let buffer = AudioBuffer::new(vec![0.1, -0.1, 0.3], 8000).unwrap();
        assert_eq!(envelope(&buffer, 100).len(), 3);
        let empty = AudioBuffer::new(Vec::new(), 8000).unwrap();
        assert!(envelope(&empty, 100).is_empty());
    }
}
