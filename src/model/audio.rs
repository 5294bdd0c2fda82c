use anyhow::Result;

/// Mono audio held entirely in memory
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples, nominally in [-1.0, 1.0]
    samples: Vec<f32>,

    /// Sample rate in Hz (always > 0)
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer, rejecting a zero sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            anyhow::bail!("Sample rate must be positive");
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Convert a time in seconds to a sample index, clamped to the buffer
    pub fn sample_at(&self, seconds: f64) -> usize {
        let index = (seconds * self.sample_rate as f64).round();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.samples.len())
        }
    }

    /// Build a new buffer at the same rate from transformed samples
    ///
    /// The rate was validated when `self` was built, so this cannot fail.
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Consume the buffer and return its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
