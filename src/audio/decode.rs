//! Audio decoding to mono using symphonia
//!
//! Decoding is all-or-nothing: a stream that cannot be read to its end, or
//! that yields no audio at all, is an error rather than a short buffer.

use crate::model::AudioBuffer;
use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as DecodeError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Share of the container's frame count that may go missing
///
/// Some containers only estimate their length (CBR MP3 without a Xing
/// header), so the decoded count is allowed to fall slightly short.
const FRAME_COUNT_TOLERANCE: f64 = 0.01;

/// Decode an audio file to mono f32 samples at its native sample rate
///
/// Multi-channel sources are averaged into a single channel. Packets the
/// codec rejects are skipped with a warning; read failures and streams
/// that end well before their announced length fail the whole load.
pub fn load_mono(path: &Path) -> Result<AudioBuffer> {
    log::debug!("Decoding audio: {:?}", path);

    let mut format = open_format(path)?;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .with_context(|| format!("No audio track in {:?}", path))?;

    let track_id = track.id;
    let expected_frames = track.codec_params.n_frames;
    let sample_rate = track
        .codec_params
        .sample_rate
        .with_context(|| format!("No sample rate in {:?}", path))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Unsupported codec in {:?}", path))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut rejected = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(DecodeError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(DecodeError::ResetRequired) => break,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read audio data from {:?}", path))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut interleaved = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                interleaved.copy_interleaved_ref(decoded);
                downmix_into(&mut mono, interleaved.samples(), spec.channels.count());
            }
            Err(DecodeError::DecodeError(reason)) => {
                rejected += 1;
                log::warn!("Skipping undecodable packet in {:?}: {}", path, reason);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to decode {:?}", path));
            }
        }
    }

    check_complete(mono.len(), expected_frames, rejected)
        .with_context(|| format!("Incomplete audio in {:?}", path))?;

    log::debug!(
        "Decoded {} frames ({:.1}s) at {}Hz",
        mono.len(),
        mono.len() as f64 / sample_rate as f64,
        sample_rate
    );

    AudioBuffer::new(mono, sample_rate)
}

/// Probe the container, using the file extension as a hint
fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {:?}", path))?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, source, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unrecognised audio format: {:?}", path))?;

    Ok(probed.format)
}

/// Decide whether a finished decode produced the whole stream
fn check_complete(decoded: usize, expected: Option<u64>, rejected: usize) -> Result<()> {
    let expected = expected.unwrap_or(0);

    if decoded == 0 && (rejected > 0 || expected > 0) {
        anyhow::bail!(
            "no audio decoded ({} packet(s) rejected, {} frame(s) announced)",
            rejected,
            expected
        );
    }
    if (decoded as f64) < expected as f64 * (1.0 - FRAME_COUNT_TOLERANCE) {
        anyhow::bail!("stream ends early: decoded {} of {} frames", decoded, expected);
    }
    Ok(())
}

/// Append interleaved samples to `out`, averaging channels
fn downmix_into(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels > 1 {
        out.extend(
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    } else {
        out.extend_from_slice(interleaved);
    }
}
