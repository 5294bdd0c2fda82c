//! MIDI click track export using the midly crate
//!
//! One note per detected beat on a fixed 4/4 grid, every bar's first
//! pulse accented. The grid is decorative: pulse timing comes from the
//! tempo alone, not from the detected beat spacing.

use anyhow::{Context, Result};
use midly::num::u24;
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use std::path::Path;

/// Pulses per quarter note
pub const CLICK_PPQ: u16 = 480;

/// Every `ACCENT_PERIOD`th pulse (0-indexed) is accented
pub const ACCENT_PERIOD: usize = 4;

/// Velocity of accented (downbeat) pulses
pub const ACCENT_VELOCITY: u8 = 100;

/// Velocity of the other pulses
pub const NORMAL_VELOCITY: u8 = 70;

/// General MIDI side stick
pub const CLICK_NOTE: u8 = 37;

/// Lowest tempo used when converting BPM to microseconds per beat
const MIN_TEMPO_BPM: f64 = 1e-6;

/// Largest value the 24-bit tempo field can carry
const MAX_TEMPO_MICROS: u32 = 0x00FF_FFFF;

/// Tempo and pulse count of a click track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTrack {
    pub tempo_bpm: f64,
    pub beats: usize,
}

impl ClickTrack {
    pub fn new(tempo_bpm: f64, beats: usize) -> Self {
        Self { tempo_bpm, beats }
    }

    /// Microseconds per quarter note, as stored in the tempo meta event
    pub fn micros_per_beat(&self) -> u32 {
        let micros = (60_000_000.0 / self.tempo_bpm.max(MIN_TEMPO_BPM)).round();
        if micros >= MAX_TEMPO_MICROS as f64 {
            MAX_TEMPO_MICROS
        } else {
            micros as u32
        }
    }

    /// Note-on velocity of pulse `i`
    pub fn velocity(i: usize) -> u8 {
        if i % ACCENT_PERIOD == 0 {
            ACCENT_VELOCITY
        } else {
            NORMAL_VELOCITY
        }
    }

    /// Build the single-track MIDI event list
    fn events(&self) -> Track<'static> {
        let mut track = Track::new();

        track.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(self.micros_per_beat()))),
        });

        for i in 0..self.beats {
            track.push(TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Midi {
                    channel: 0.into(),
                    message: MidiMessage::NoteOn {
                        key: CLICK_NOTE.into(),
                        vel: Self::velocity(i).into(),
                    },
                },
            });
            track.push(TrackEvent {
                delta: u32::from(CLICK_PPQ).into(),
                kind: TrackEventKind::Midi {
                    channel: 0.into(),
                    message: MidiMessage::NoteOff {
                        key: CLICK_NOTE.into(),
                        vel: 0.into(),
                    },
                },
            });
        }

        track.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        track
    }

    /// Encode as Standard MIDI File bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let smf = Smf {
            header: Header {
                format: Format::SingleTrack,
                timing: Timing::Metrical(CLICK_PPQ.into()),
            },
            tracks: vec![self.events()],
        };

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)
            .context("Failed to encode MIDI click track")?;
        Ok(bytes)
    }

    /// Write the click track to a `.mid` file
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write MIDI file: {:?}", path))?;

        log::debug!(
            "Click track written: {} pulses at {:.2} BPM to {:?}",
            self.beats,
            self.tempo_bpm,
            path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on_velocities(smf: &Smf) -> Vec<u8> {
        smf.tracks[0]
            .iter()
            .filter_map(|e| match &e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } => Some(vel.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_accent_pattern_and_tempo() {
        let bytes = ClickTrack::new(120.0, 8).to_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(480.into()));
        assert_eq!(note_on_velocities(&smf), vec![100, 70, 70, 70, 100, 70, 70, 70]);

        if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = &smf.tracks[0][0].kind {
            assert_eq!(u32::from(*tempo), 500000);
        } else {
            panic!("Expected Tempo event first");
        }
    }

    #[test]
    fn test_note_off_after_one_quarter() {
        let bytes = ClickTrack::new(100.0, 2).to_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let track = &smf.tracks[0];

        // tempo, (on, off) x2, end of track
        assert_eq!(track.len(), 6);
        assert_eq!(track[2].delta.as_int(), 480);
        assert!(matches!(
            track[2].kind,
            TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. }
        ));
        assert!(matches!(track[5].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    }

    #[test]
    fn test_micros_per_beat_rounding_and_clamp() {
        assert_eq!(ClickTrack::new(120.0, 0).micros_per_beat(), 500_000);
        assert_eq!(ClickTrack::new(128.0, 0).micros_per_beat(), 468_750);
        assert_eq!(ClickTrack::new(90.5, 0).micros_per_beat(), 662_983);
        assert_eq!(ClickTrack::new(0.0, 0).micros_per_beat(), MAX_TEMPO_MICROS);
    }

    #[test]
    fn test_save_writes_parseable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("click.mid");
        ClickTrack::new(128.0, 5).save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(note_on_velocities(&smf), vec![100, 70, 70, 70, 100]);
    }

    #[test]
    fn test_empty_click_track_is_valid() {
        let bytes = ClickTrack::new(0.0, 0).to_bytes().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks[0].len(), 2);
    }
}
