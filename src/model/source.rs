use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Descriptive information about an input audio file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Path the audio was loaded from
    pub file_path: PathBuf,

    /// File name shown in reports
    pub file_name: String,

    /// Title from embedded tags (optional)
    pub title: Option<String>,

    /// Artist from embedded tags (optional)
    pub artist: Option<String>,

    /// Decoded duration in seconds
    pub duration_secs: f64,

    /// Native sample rate in Hz
    pub sample_rate: u32,
}

impl SourceInfo {
    /// Create info without tag metadata
    pub fn new(file_path: &Path, duration_secs: f64, sample_rate: u32) -> Self {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        Self {
            file_path: file_path.to_path_buf(),
            file_name,
            title: None,
            artist: None,
            duration_secs,
            sample_rate,
        }
    }

    /// File name without its extension, used to name derived artifacts
    pub fn stem(&self) -> String {
        self.file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}
