//! easy-midi: build MIDI files from notes, chords and roman numerals
//!
//! Construct [`Note`]s, [`Chord`]s and [`RomanChord`]s, append them to
//! [`Track`]s, add the tracks to an [`EasyMidi`] and write a Standard MIDI
//! File. Durations are exact fractions of a whole note (`1/4` = quarter).
//!
//! ```rust,no_run
//! use easy_midi::{Chord, EasyMidi, Note, Rational, RomanChord, Track};
//!
//! # fn main() -> easy_midi::Result<()> {
//! let mut track = Track::new("acoustic grand piano")?;
//! let quarter = Rational::new(1, 4);
//!
//! let c = Note::new("C", 4, quarter, 100)?;
//! let e = Note::new("E", 4, quarter, 100)?;
//! let g = Note::new("G", 4, quarter, 100)?;
//! let chord = Chord::new([c.clone(), e.clone(), g.clone()])?;
//!
//! track.add_notes([c, e, g]);
//! track.add(chord);
//! track.add(RomanChord::parse("IV")?);
//! track.add(RomanChord::parse("V7*")?);
//!
//! let mut midi = EasyMidi::new();
//! midi.add_track(track);
//! midi.write_midi("out.mid")?;
//! # Ok(())
//! # }
//! ```
//!
//! The crate logs through the `log` facade and never installs a logger.

pub mod config;
pub mod easy_midi;
pub mod error;
pub mod models;
pub mod parse;
pub mod renderers;
pub mod theory;

// Re-export commonly used types
pub use config::{Config, NoteDefaults};
pub use easy_midi::EasyMidi;
pub use error::{EasyMidiError, Result};
pub use models::{Chord, Event, Instrument, Note, NoteName, PitchClass, Rational, RomanChord, Track};
pub use renderers::midi::{MidiSink, NoteEvent, SmfWriter, TrackHeader};
pub use theory::{Key, Mode};
