//! The twelve semitone classes of an octave
//!
//! Enharmonic spellings collapse to one class (C# and Db are both `Cs`).
//! Display and serde use sharp spelling; parsing accepts sharps, flats and
//! double accidentals.

use crate::error::{EasyMidiError, Result};
use crate::parse::pitch_name::{self, PitchToken};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PitchClass {
    #[default]
    C,
    #[serde(rename = "C#")]
    Cs,
    D,
    #[serde(rename = "D#")]
    Ds,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    G,
    #[serde(rename = "G#")]
    Gs,
    A,
    #[serde(rename = "A#")]
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Semitones above C (0-11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Pitch class for any semitone count; wraps modulo 12
    pub fn from_semitone(semitone: i32) -> PitchClass {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Move up (or down, if negative) by a number of semitones
    pub fn transpose(self, semitones: i32) -> PitchClass {
        Self::from_semitone(self.semitone() as i32 + semitones)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Flat spelling for the black keys (`Db`, `Eb`, ...)
    pub fn flat_name(&self) -> &'static str {
        match self {
            PitchClass::Cs => "Db",
            PitchClass::Ds => "Eb",
            PitchClass::Fs => "Gb",
            PitchClass::Gs => "Ab",
            PitchClass::As => "Bb",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PitchClass {
    type Err = EasyMidiError;

    fn from_str(s: &str) -> Result<Self> {
        match pitch_name::tokenize(s)? {
            PitchToken::Rest => Err(EasyMidiError::Parse(format!(
                "'{}' is a rest, not a pitch class",
                s
            ))),
            token => Ok(PitchClass::from_semitone(
                token.semitone().unwrap_or_default() as i32,
            )),
        }
    }
}
