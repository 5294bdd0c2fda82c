//! Round-trip validation of a slice directory
//!
//! Re-reads every written loop with hound and the click track with midly.

use crate::click::{CLICK_NOTE, CLICK_PPQ};
use crate::export::organizer::CLICK_FILE_NAME;
use anyhow::{Context, Result};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use std::fs;
use std::path::{Path, PathBuf};

/// What was found in a validated slice directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceReport {
    /// Number of loop files
    pub loops: usize,

    /// Sample count of each loop, in index order
    pub loop_lengths: Vec<usize>,

    /// Sample rate shared by all loops (None when there are no loops)
    pub sample_rate: Option<u32>,

    /// Pulses in click.mid, if present
    pub click_pulses: Option<usize>,

    /// Microseconds per beat in click.mid, if present
    pub click_tempo: Option<u32>,
}

/// Validate loops and click track written to `out_dir`
///
/// Loops must be readable mono WAV files numbered `loop_0000.wav` upwards
/// without gaps and share a sample rate.
pub fn validate_slices(out_dir: &Path) -> Result<SliceReport> {
    log::info!("Validating slices at: {:?}", out_dir);

    if !out_dir.is_dir() {
        anyhow::bail!("Slice directory not found: {:?}", out_dir);
    }

    let mut report = SliceReport::default();

    for (expected, path) in loop_files(out_dir)?.into_iter().enumerate() {
        let index = loop_index(&path);
        if index != Some(expected) {
            anyhow::bail!("Loop numbering gap: expected loop {:04}, found {:?}", expected, path);
        }

        let reader = hound::WavReader::open(&path)
            .with_context(|| format!("Failed to read loop: {:?}", path))?;
        let spec = reader.spec();
        if spec.channels != 1 {
            anyhow::bail!("Loop {:?} has {} channels, expected mono", path, spec.channels);
        }
        match report.sample_rate {
            Some(rate) if rate != spec.sample_rate => {
                anyhow::bail!(
                    "Loop {:?} has sample rate {} Hz, others have {} Hz",
                    path,
                    spec.sample_rate,
                    rate
                );
            }
            _ => report.sample_rate = Some(spec.sample_rate),
        }

        let len = reader.duration() as usize;
        log::debug!("  {:?}: {} samples", path.file_name().unwrap_or_default(), len);
        report.loop_lengths.push(len);
    }
    report.loops = report.loop_lengths.len();

    let click_path = out_dir.join(CLICK_FILE_NAME);
    if click_path.exists() {
        let (pulses, tempo) = validate_click(&click_path)?;
        log::info!("  Click track: {} pulses, {} us per beat", pulses, tempo);
        report.click_pulses = Some(pulses);
        report.click_tempo = Some(tempo);
    }

    log::info!("  {} loop(s) validated", report.loops);
    Ok(report)
}

/// Parse a click track, returning (pulse count, microseconds per beat)
fn validate_click(path: &Path) -> Result<(usize, u32)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read click track: {:?}", path))?;
    let smf = Smf::parse(&bytes).with_context(|| format!("Failed to parse click track: {:?}", path))?;

    if smf.header.timing != Timing::Metrical(CLICK_PPQ.into()) {
        anyhow::bail!("Unexpected click track timing: {:?}", smf.header.timing);
    }
    let track = match smf.tracks.as_slice() {
        [track] => track,
        tracks => anyhow::bail!("Expected one track in click track, found {}", tracks.len()),
    };

    let mut tempo = None;
    let mut pulses = 0;
    for event in track {
        match &event.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => tempo = Some(u32::from(*t)),
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. },
                ..
            } => {
                if key.as_int() != CLICK_NOTE {
                    anyhow::bail!("Unexpected note {} in click track", key.as_int());
                }
                pulses += 1;
            }
            _ => {}
        }
    }

    let tempo = tempo.context("Click track has no tempo event")?;
    Ok((pulses, tempo))
}

/// `loop_*.wav` files in the directory, sorted by name
fn loop_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let path = entry?.path();
        let is_loop = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("loop_") && n.ends_with(".wav"))
            .unwrap_or(false);
        if is_loop {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn loop_index(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("loop_")?
        .parse()
        .ok()
}
