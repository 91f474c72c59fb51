//! MIDI export
//!
//! Tracks are flattened into tick-based [`NoteEvent`]s by the converter and
//! handed to a [`MidiSink`]. [`SmfWriter`] is the sink that produces
//! Standard MIDI File bytes.
//!
//! # Usage
//! ```rust,ignore
//! use easy_midi::renderers::midi::{render_tracks, MidiSink, SmfWriter};
//!
//! let mut writer = SmfWriter::new(config.ticks_per_quarter)?;
//! render_tracks(&tracks, &config, &mut writer)?;
//! let bytes = writer.serialize()?;
//! ```

pub mod converter;
pub mod defaults;
pub mod sink;
pub mod write;

pub use converter::{render_tracks, whole_notes_to_ticks};
pub use defaults::{assign_channel, DEFAULT_PROGRAM, DEFAULT_TEMPO_BPM, DEFAULT_TPQ, DEFAULT_VOLUME, DRUM_CHANNEL};
pub use sink::{MidiSink, NoteEvent, TrackHeader};
pub use write::SmfWriter;
