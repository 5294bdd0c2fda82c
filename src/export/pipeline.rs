//! Command orchestration: load, analyse, transform, write

use super::config::{AnalyzeConfig, QuantizeConfig, SliceConfig};
use super::organizer::{report_path, OutputOrganizer};
use crate::analysis::{AnalysisSummary, BeatEstimator};
use crate::audio::{load_mono, read_source_info, write_wav};
use crate::click::ClickTrack;
use crate::model::{AudioBuffer, BeatTrack};
use crate::quantize::quantize;
use crate::report::write_report;
use crate::slicing::slice_loops;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// What a slicing run wrote
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    /// Loop files in index order
    pub loop_paths: Vec<PathBuf>,
    /// Sample count of each loop, same order
    pub loop_lengths: Vec<usize>,
    pub click_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub tempo_bpm: f64,
    pub beats: usize,
}

impl SliceOutcome {
    pub fn loops_exported(&self) -> usize {
        self.loop_paths.len()
    }
}

/// What a quantization run wrote
#[derive(Debug, Clone)]
pub struct QuantizeOutcome {
    pub out_path: PathBuf,
    pub beats: usize,
    pub samples: usize,
}

/// Main processing pipeline, generic over the beat estimator
pub struct GroovePipeline<E: BeatEstimator> {
    estimator: E,
}

impl<E: BeatEstimator> GroovePipeline<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }

    /// Decode a file and estimate its beats
    pub fn load(&self, audio_path: &Path) -> Result<(AudioBuffer, BeatTrack)> {
        let buffer = load_mono(audio_path)
            .with_context(|| format!("Failed to load audio: {:?}", audio_path))?;
        let track = self
            .estimator
            .estimate(&buffer)
            .with_context(|| format!("Failed to estimate beats: {:?}", audio_path))?;

        log::info!(
            "{:?}: {:.1}s at {}Hz, BPM {:.2}, {} beats",
            audio_path.file_name().unwrap_or(audio_path.as_os_str()),
            buffer.duration_secs(),
            buffer.sample_rate(),
            track.tempo_bpm(),
            track.len()
        );

        Ok((buffer, track))
    }

    /// Analyse one file, writing a report if configured
    pub fn analyze(&self, audio_path: &Path, config: &AnalyzeConfig) -> Result<AnalysisSummary> {
        let (buffer, track) = self.load(audio_path)?;
        let info = read_source_info(audio_path, &buffer);

        if let Some(dir) = &config.report_dir {
            let path = report_path(dir, &info.stem());
            write_report(&path, &info, &buffer, &track)?;
            log::info!("Report: {:?}", path);
        }

        Ok(AnalysisSummary::new(info.file_name, &buffer, &track))
    }

    /// Analyse many files in parallel
    ///
    /// Each file succeeds or fails on its own; results keep input order.
    pub fn analyze_batch(
        &self,
        audio_paths: &[PathBuf],
        config: &AnalyzeConfig,
    ) -> Vec<(PathBuf, Result<AnalysisSummary>)> {
        log::info!("Analyzing {} file(s)...", audio_paths.len());

        audio_paths
            .par_iter()
            .map(|path| (path.clone(), self.analyze(path, config)))
            .collect()
    }

    /// Slice a file into bar-aligned loops
    pub fn slice(&self, audio_path: &Path, config: &SliceConfig) -> Result<SliceOutcome> {
        config.validate()?;

        let (buffer, track) = self.load(audio_path)?;

        // Nothing is written until the audio decoded and analysed
        let organizer = OutputOrganizer::new(config.out_dir.clone());
        organizer.init()?;

        let loops = slice_loops(&buffer, track.times(), config.bars_per_loop, config.crossfade_secs);

        let mut loop_paths = Vec::with_capacity(loops.len());
        let mut loop_lengths = Vec::with_capacity(loops.len());
        for segment in &loops {
            let path = organizer.loop_path(segment);
            write_wav(&path, &segment.samples, segment.sample_rate, config.output_format)
                .with_context(|| format!("Failed to write loop {}", segment.index))?;

            log::debug!(
                "Loop {}: samples {}..{} ({:.3}s)",
                segment.index,
                segment.start_sample,
                segment.end_sample,
                segment.duration_secs()
            );
            loop_paths.push(path);
            loop_lengths.push(segment.len());
        }
        log::info!("Exported {} loop(s) to {:?}", loops.len(), organizer.out_dir());

        let click_path = if config.midi_click {
            let path = organizer.click_path();
            ClickTrack::new(track.tempo_bpm(), track.len()).save(&path)?;
            log::info!("Click track: {:?}", path);
            Some(path)
        } else {
            None
        };

        let report_path = if config.report {
            let info = read_source_info(audio_path, &buffer);
            let path = organizer.report_path(&info.stem());
            write_report(&path, &info, &buffer, &track)?;
            Some(path)
        } else {
            None
        };

        Ok(SliceOutcome {
            loop_paths,
            loop_lengths,
            click_path,
            report_path,
            tempo_bpm: track.tempo_bpm(),
            beats: track.len(),
        })
    }

    /// Quantize a file toward its median beat grid
    pub fn quantize(&self, audio_path: &Path, config: &QuantizeConfig) -> Result<QuantizeOutcome> {
        config.validate()?;

        let (buffer, track) = self.load(audio_path)?;
        let beats = track.sample_frames(buffer.sample_rate());
        let quantized = quantize(&buffer, &beats, config.strength);

        if let Some(parent) = config.out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
        write_wav(
            &config.out_path,
            quantized.samples(),
            quantized.sample_rate(),
            config.output_format,
        )?;

        log::info!("Quantized audio written to {:?}", config.out_path);

        Ok(QuantizeOutcome {
            out_path: config.out_path.clone(),
            beats: beats.len(),
            samples: quantized.len(),
        })
    }
}
