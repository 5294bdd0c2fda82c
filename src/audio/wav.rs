//! WAV output using hound

use anyhow::{Context, Result};
use std::path::Path;

/// Sample encoding used for written WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 16-bit signed PCM
    #[default]
    Pcm16,

    /// 32-bit IEEE float, lossless for the in-memory samples
    Float32,
}

impl OutputFormat {
    fn spec(self, sample_rate: u32) -> hound::WavSpec {
        match self {
            OutputFormat::Pcm16 => hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
            OutputFormat::Float32 => hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            },
        }
    }
}

/// Write mono samples to a WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, format: OutputFormat) -> Result<()> {
    log::debug!("Writing {} samples to {:?} ({:?})", samples.len(), path, format);

    let mut writer = hound::WavWriter::create(path, format.spec(sample_rate))
        .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

    match format {
        OutputFormat::Pcm16 => {
            for &sample in samples {
                writer.write_sample(to_pcm16(sample))?;
            }
        }
        OutputFormat::Float32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {:?}", path))?;
    Ok(())
}

/// Convert f32 (-1.0 to 1.0) to i16
#[inline]
fn to_pcm16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
