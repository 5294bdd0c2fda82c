//! Waveform plot rendering for HTML reports

use crate::analysis::waveform::{envelope, Column};
use crate::model::{AudioBuffer, BeatTrack};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Default plot width in pixels
pub const PLOT_WIDTH: u32 = 1200;

/// Default plot height in pixels
pub const PLOT_HEIGHT: u32 = 300;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([200, 200, 200]);
const WAVE: Rgb<u8> = Rgb([31, 119, 180]);
const BEAT: Rgb<u8> = Rgb([214, 39, 40]);

/// Draw the waveform envelope with beat markers
pub fn render_waveform(buffer: &AudioBuffer, track: &BeatTrack, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);
    let (width, height) = img.dimensions();
    let mid = height / 2;

    for x in 0..width {
        img.put_pixel(x, mid, AXIS);
    }

    // Beats first so the waveform stays readable on top
    if !buffer.is_empty() {
        for &t in track.times() {
            let x = (t / buffer.duration_secs() * width as f64) as u32;
            if x < width {
                draw_vertical(&mut img, x, 0, height - 1, BEAT);
            }
        }
    }

    let columns = envelope(buffer, width as usize);
    let scale = peak_scale(&columns);
    let span = columns.len().max(1) as u32;

    for (i, column) in columns.iter().enumerate() {
        let x = i as u32 * width / span;
        let top = to_row(column.max * scale, height);
        let bottom = to_row(column.min * scale, height);
        draw_vertical(&mut img, x, top, bottom, WAVE);
    }

    img
}

/// Render the plot and encode it as PNG bytes
pub fn render_png(buffer: &AudioBuffer, track: &BeatTrack, width: u32, height: u32) -> Result<Vec<u8>> {
    let img = render_waveform(buffer, track, width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode waveform PNG")?;
    Ok(out.into_inner())
}

/// Gain that makes the loudest column fill the plot height
fn peak_scale(columns: &[Column]) -> f32 {
    let peak = columns
        .iter()
        .map(|c| c.max.abs().max(c.min.abs()))
        .fold(0.0f32, f32::max);
    if peak > 0.0 {
        1.0 / peak
    } else {
        1.0
    }
}

/// Map an amplitude in [-1, 1] to an image row (row 0 is the top)
fn to_row(amplitude: f32, height: u32) -> u32 {
    let normalized = (1.0 - amplitude.clamp(-1.0, 1.0)) / 2.0;
    ((normalized * (height - 1) as f32).round() as u32).min(height - 1)
}

fn draw_vertical(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    for y in top..=bottom {
        img.put_pixel(x, y, color);
    }
}
