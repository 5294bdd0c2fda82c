//! Output file layout and input discovery

use crate::model::Loop;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when an input is a directory
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "m4a", "aac", "aiff", "aif"];

/// File name of the MIDI click track inside a slice directory
pub const CLICK_FILE_NAME: &str = "click.mid";

/// Manages the files written by one slicing run
pub struct OutputOrganizer {
    /// Directory receiving loops, click track and report
    out_dir: PathBuf,
}

impl OutputOrganizer {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    /// Create the output directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", self.out_dir))?;
        log::debug!("Output directory ready: {:?}", self.out_dir);
        Ok(())
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path for an exported loop (`loop_0000.wav`, ...)
    pub fn loop_path(&self, segment: &Loop) -> PathBuf {
        self.out_dir.join(segment.file_name())
    }

    /// Path for the click track
    pub fn click_path(&self) -> PathBuf {
        self.out_dir.join(CLICK_FILE_NAME)
    }

    /// Path for a report inside the output directory
    pub fn report_path(&self, stem: &str) -> PathBuf {
        report_path(&self.out_dir, stem)
    }
}

/// `<dir>/<stem>_groove.html`
pub fn report_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}_groove.html", stem))
}

/// Whether a path has one of [`AUDIO_EXTENSIONS`] (case-insensitive)
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand inputs into audio files
///
/// Files are taken as given (whatever their extension); directories are
/// walked recursively for audio files. The result is sorted and
/// de-duplicated.
pub fn collect_audio_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry.with_context(|| format!("Failed to scan directory: {:?}", input))?;
                if entry.file_type().is_file() && is_audio_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if input.exists() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input not found: {:?}", input);
        }
    }

    files.sort();
    files.dedup();

    log::debug!("Collected {} audio file(s) from {} input(s)", files.len(), inputs.len());
    Ok(files)
}
