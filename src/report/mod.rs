//! HTML analysis reports
//!
//! A report is a single HTML file: summary text plus the waveform plot
//! embedded as a base64 PNG.

mod html;
mod plot;

pub use html::{render_report, write_report};
pub use plot::{render_png, render_waveform, PLOT_HEIGHT, PLOT_WIDTH};
