//! The narrow interface between the music model and a MIDI writer
//!
//! `EasyMidi` only ever talks to a [`MidiSink`]. The production sink is
//! [`SmfWriter`](super::SmfWriter); tests can record calls instead of
//! producing bytes.

use crate::error::Result;

/// One sounding note, already converted to ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    /// MIDI note number 0-127
    pub key: u8,
    pub start_tick: u64,
    pub duration_ticks: u64,
    /// Velocity 0-127
    pub velocity: u8,
    /// MIDI channel 0-15
    pub channel: u8,
}

/// Per-track header information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackHeader {
    pub name: String,
    /// Channel used for the program change
    pub channel: u8,
    /// General MIDI program 0-127
    pub program: u8,
}

pub trait MidiSink {
    fn set_tempo(&mut self, bpm: f64);

    fn set_time_signature(&mut self, numerator: u8, denominator: u8);

    /// Open a new track; returns its index for [`MidiSink::add_note`]
    fn add_track(&mut self, header: TrackHeader) -> usize;

    fn add_note(&mut self, track: usize, note: NoteEvent) -> Result<()>;

    /// Encode everything added so far
    fn serialize(&self) -> Result<Vec<u8>>;
}
