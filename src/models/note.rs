//! A single pitched note or rest

use crate::config::{Config, NoteDefaults};
use crate::error::{EasyMidiError, Result};
use crate::models::{PitchClass, Rational};
use crate::parse::pitch_name::{self, PitchToken};
use crate::theory::resolver;
use std::fmt;

/// What a note sounds: a pitch class, or silence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    Pitched(PitchClass),
    Rest,
}

impl NoteName {
    pub fn parse(token: &str) -> Result<NoteName> {
        Ok(match pitch_name::tokenize(token)? {
            PitchToken::Rest => NoteName::Rest,
            pitched => NoteName::Pitched(PitchClass::from_semitone(
                pitched.semitone().unwrap_or_default() as i32,
            )),
        })
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteName::Pitched(pc) => write!(f, "{}", pc),
            NoteName::Rest => f.write_str("R"),
        }
    }
}

/// A note with octave, duration (whole-note units), volume and optional channel.
///
/// Every constructor and setter validates, so a `Note` always resolves to a
/// MIDI number in 0-127 (unless it is a rest).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Note {
    name: NoteName,
    octave: i8,
    duration: Rational,
    volume: u8,
    /// `None` plays on the owning track's channel
    channel: Option<u8>,
}

impl Note {
    /// Build a note from a name token like `"C"`, `"F#"`, `"Bb"` or `"R"`.
    pub fn new(name: &str, octave: i8, duration: Rational, volume: u8) -> Result<Note> {
        Note::from_name(NoteName::parse(name)?, octave, duration, volume)
    }

    /// Build a note using [`Config::default`] for octave, duration and volume
    pub fn parse(name: &str) -> Result<Note> {
        Note::with_defaults(name, &Config::default().note)
    }

    pub fn with_defaults(name: &str, defaults: &NoteDefaults) -> Result<Note> {
        Note::new(name, defaults.octave, defaults.duration, defaults.volume)
    }

    pub fn from_pitch(pitch: PitchClass, octave: i8, duration: Rational, volume: u8) -> Result<Note> {
        Note::from_name(NoteName::Pitched(pitch), octave, duration, volume)
    }

    /// Build a note from a raw MIDI number (60 = C4)
    pub fn from_midi(midi: u8, duration: Rational, volume: u8) -> Result<Note> {
        let midi = resolver::check_midi(midi as i32)?;
        let (pitch, octave) = resolver::split(midi);
        Note::from_pitch(pitch, octave, duration, volume)
    }

    /// A silent note that only advances time
    pub fn rest(duration: Rational) -> Result<Note> {
        let defaults = NoteDefaults::default();
        Note::from_name(NoteName::Rest, defaults.octave, duration, defaults.volume)
    }

    fn from_name(name: NoteName, octave: i8, duration: Rational, volume: u8) -> Result<Note> {
        let note = Note {
            name,
            octave,
            duration,
            volume,
            channel: None,
        };
        note.validate()?;
        Ok(note)
    }

    fn validate(&self) -> Result<()> {
        if self.duration <= Rational::from_integer(0) {
            return Err(EasyMidiError::Range(format!(
                "note duration must be positive, got {}",
                self.duration
            )));
        }
        if self.volume > 127 {
            return Err(EasyMidiError::Range(format!(
                "volume must be 0-127, got {}",
                self.volume
            )));
        }
        if let Some(channel) = self.channel {
            if channel > 15 {
                return Err(EasyMidiError::Range(format!(
                    "channel must be 0-15, got {}",
                    channel
                )));
            }
        }
        if let NoteName::Pitched(pitch) = self.name {
            resolver::resolve(pitch, self.octave)?;
        }
        Ok(())
    }

    /// Apply a change to a copy, keep it only if it still validates
    fn update(&mut self, change: impl FnOnce(&mut Note)) -> Result<()> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    pub fn name(&self) -> NoteName {
        self.name
    }

    pub fn pitch_class(&self) -> Option<PitchClass> {
        match self.name {
            NoteName::Pitched(pitch) => Some(pitch),
            NoteName::Rest => None,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.name == NoteName::Rest
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn duration(&self) -> Rational {
        self.duration
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// MIDI note number, `None` for rests
    pub fn midi_number(&self) -> Option<u8> {
        self.pitch_class()
            .and_then(|pitch| resolver::resolve(pitch, self.octave).ok())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = NoteName::parse(name)?;
        self.update(|note| note.name = name)
    }

    pub fn set_octave(&mut self, octave: i8) -> Result<()> {
        self.update(|note| note.octave = octave)
    }

    pub fn set_duration(&mut self, duration: Rational) -> Result<()> {
        self.update(|note| note.duration = duration)
    }

    pub fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.update(|note| note.volume = volume)
    }

    pub fn set_channel(&mut self, channel: Option<u8>) -> Result<()> {
        self.update(|note| note.channel = channel)
    }

    pub fn with_octave(mut self, octave: i8) -> Result<Note> {
        self.set_octave(octave)?;
        Ok(self)
    }

    pub fn with_duration(mut self, duration: Rational) -> Result<Note> {
        self.set_duration(duration)?;
        Ok(self)
    }

    pub fn with_volume(mut self, volume: u8) -> Result<Note> {
        self.set_volume(volume)?;
        Ok(self)
    }

    pub fn with_channel(mut self, channel: u8) -> Result<Note> {
        self.set_channel(Some(channel))?;
        Ok(self)
    }

    /// Shift by semitones, carrying into neighbouring octaves. Rests are unchanged.
    pub fn transpose(&self, semitones: i32) -> Result<Note> {
        let Some(midi) = self.midi_number() else {
            return Ok(self.clone());
        };
        let shifted = resolver::check_midi(midi as i32 + semitones)?;
        let (pitch, octave) = resolver::split(shifted);
        let mut note = self.clone();
        note.update(|n| {
            n.name = NoteName::Pitched(pitch);
            n.octave = octave;
        })?;
        Ok(note)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            NoteName::Rest => write!(f, "R ({})", self.duration),
            NoteName::Pitched(pitch) => write!(f, "{}{} ({})", pitch, self.octave, self.duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter() -> Rational {
        Rational::new(1, 4)
    }

    #[test]
    fn test_defaults() {
        let note = Note::parse("C").unwrap();
        assert_eq!(note.octave(), 4);
        assert_eq!(note.duration(), quarter());
        assert_eq!(note.volume(), 64);
        assert_eq!(note.channel(), None);
        assert_eq!(note.midi_number(), Some(60));
    }

    #[test]
    fn test_enharmonic_names_resolve_equally() {
        let sharp = Note::new("C#", 5, quarter(), 100).unwrap();
        let flat = Note::new("Db", 5, quarter(), 100).unwrap();
        assert_eq!(sharp.midi_number(), Some(73));
        assert_eq!(sharp, flat);
    }

    #[test]
    fn test_invalid_name_is_parse_error() {
        assert!(matches!(
            Note::new("H", 4, quarter(), 100),
            Err(EasyMidiError::Parse(_))
        ));
    }

    #[test]
    fn test_out_of_range_pitch() {
        assert!(Note::new("G", 9, quarter(), 100).is_ok());
        assert!(matches!(
            Note::new("G#", 9, quarter(), 100),
            Err(EasyMidiError::Range(_))
        ));
        assert!(matches!(
            Note::new("B", -2, quarter(), 100),
            Err(EasyMidiError::Range(_))
        ));
    }

    #[test]
    fn test_duration_and_volume_ranges() {
        assert!(matches!(
            Note::new("C", 4, Rational::from_integer(0), 100),
            Err(EasyMidiError::Range(_))
        ));
        assert!(Note::new("C", 4, Rational::new(-1, 4), 100).is_err());
        assert!(Note::new("C", 4, quarter(), 128).is_err());
        assert!(Note::new("C", 4, quarter(), 127).is_ok());
    }

    #[test]
    fn test_setters_revalidate() {
        let mut note = Note::new("G", 8, quarter(), 100).unwrap();
        assert!(note.set_octave(10).is_err());
        // failed update leaves the note untouched
        assert_eq!(note.octave(), 8);

        note.set_volume(20).unwrap();
        assert_eq!(note.volume(), 20);
        assert!(note.set_channel(Some(16)).is_err());
        note.set_channel(Some(3)).unwrap();
        assert_eq!(note.channel(), Some(3));

        note.set_name("A").unwrap();
        assert_eq!(note.midi_number(), Some(117));
    }

    #[test]
    fn test_rest() {
        let rest = Note::new("R", 4, quarter(), 100).unwrap();
        assert!(rest.is_rest());
        assert_eq!(rest.midi_number(), None);
        assert_eq!(Note::rest(Rational::new(1, 2)).unwrap().duration(), Rational::new(1, 2));
    }

    #[test]
    fn test_transpose_crosses_octave() {
        let b4 = Note::parse("B").unwrap();
        let c5 = b4.transpose(1).unwrap();
        assert_eq!(c5.pitch_class(), Some(PitchClass::C));
        assert_eq!(c5.octave(), 5);
        assert_eq!(c5.duration(), b4.duration());
        assert!(Note::from_midi(127, quarter(), 100).unwrap().transpose(1).is_err());
    }

    #[test]
    fn test_from_midi() {
        let note = Note::from_midi(69, quarter(), 100).unwrap();
        assert_eq!(note.pitch_class(), Some(PitchClass::A));
        assert_eq!(note.octave(), 4);
        assert!(Note::from_midi(128, quarter(), 100).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::parse("F#").unwrap().to_string(), "F#4 (1/4)");
        assert_eq!(Note::rest(Rational::new(1, 2)).unwrap().to_string(), "R (1/2)");
    }
}
