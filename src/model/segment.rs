/// One bar-aligned loop cut from a source buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Ordinal in emission order (0-based)
    pub index: usize,

    /// First sample of the loop in the source buffer
    pub start_sample: usize,

    /// One past the last sample in the source buffer
    pub end_sample: usize,

    /// Loop samples with the edge crossfade applied
    pub samples: Vec<f32>,

    /// Sample rate of the source
    pub sample_rate: u32,
}

impl Loop {
    /// File name used on export (`loop_0000.wav`, ...)
    pub fn file_name(&self) -> String {
        format!("loop_{:04}.wav", self.index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
