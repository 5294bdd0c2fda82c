//! HTML analysis report

use super::plot::{render_png, PLOT_HEIGHT, PLOT_WIDTH};
use crate::analysis::waveform::levels;
use crate::model::{AudioBuffer, BeatTrack, SourceInfo};
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Render a self-contained HTML report with an inline waveform image
pub fn render_report(info: &SourceInfo, buffer: &AudioBuffer, track: &BeatTrack) -> Result<String> {
    let png = render_png(buffer, track, PLOT_WIDTH, PLOT_HEIGHT)?;
    let encoded = STANDARD.encode(&png);
    let signal = levels(buffer);
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut tags = String::new();
    if let Some(title) = &info.title {
        tags.push_str(&format!("<p>Title: {}</p>\n", escape(title)));
    }
    if let Some(artist) = &info.artist {
        tags.push_str(&format!("<p>Artist: {}</p>\n", escape(artist)));
    }

    Ok(format!(
        r#"<!doctype html><html><head><meta charset="utf-8"><title>GrooveSlicer - {name}</title></head>
<body><h1>GrooveSlicer report</h1>
<p>File: {name}</p>
{tags}<p>Estimated BPM: {bpm:.2}</p>
<img src="data:image/png;base64,{png}" alt="Waveform of {name}">
<p>Beats: {beats}</p>
<p>Duration: {duration:.2}s at {rate} Hz (peak {peak:.3}, RMS {rms:.3})</p>
<p><small>Generated {generated}</small></p>
</body></html>
"#,
        name = escape(&info.file_name),
        tags = tags,
        bpm = track.tempo_bpm(),
        png = encoded,
        beats = track.len(),
        duration = buffer.duration_secs(),
        rate = buffer.sample_rate(),
        peak = signal.peak,
        rms = signal.rms,
        generated = generated,
    ))
}

/// Render and write a report to `path`, creating parent directories
pub fn write_report(path: &Path, info: &SourceInfo, buffer: &AudioBuffer, track: &BeatTrack) -> Result<()> {
    let html = render_report(info, buffer, track)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {:?}", parent))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write report: {:?}", path))?;

    log::debug!("Report written to {:?}", path);
    Ok(())
}

/// Escape text for HTML element and attribute content
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
