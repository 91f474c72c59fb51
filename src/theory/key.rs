//! Keys and modes
//!
//! A [`Key`] is a tonic plus a [`Mode`]; each mode is a static pattern of
//! seven semitone steps that walks one octave from the tonic.

use crate::error::{EasyMidiError, Result};
use crate::models::PitchClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Major,
    /// Natural minor (aeolian)
    Minor,
    /// Natural minor with a raised seventh
    HarmonicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
}

impl Mode {
    /// Semitone steps between consecutive scale degrees (sums to 12)
    pub fn steps(self) -> [u8; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
            Mode::HarmonicMinor => [2, 1, 2, 2, 1, 3, 1],
            Mode::Dorian => [2, 1, 2, 2, 2, 1, 2],
            Mode::Phrygian => [1, 2, 2, 2, 1, 2, 2],
            Mode::Lydian => [2, 2, 2, 1, 2, 2, 1],
            Mode::Mixolydian => [2, 2, 1, 2, 2, 1, 2],
            Mode::Locrian => [1, 2, 2, 1, 2, 2, 2],
        }
    }

    /// Semitones above the tonic for each of the seven degrees
    pub fn offsets(self) -> [u8; 7] {
        let steps = self.steps();
        let mut offsets = [0u8; 7];
        for i in 1..7 {
            offsets[i] = offsets[i - 1] + steps[i - 1];
        }
        offsets
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::HarmonicMinor => "harmonic minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Locrian => "locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = EasyMidiError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "major" | "maj" | "ionian" => Ok(Mode::Major),
            "minor" | "min" | "m" | "aeolian" | "natural minor" => Ok(Mode::Minor),
            "harmonic minor" | "harmonic" => Ok(Mode::HarmonicMinor),
            "dorian" => Ok(Mode::Dorian),
            "phrygian" => Ok(Mode::Phrygian),
            "lydian" => Ok(Mode::Lydian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "locrian" => Ok(Mode::Locrian),
            _ => Err(EasyMidiError::Configuration(format!(
                "unknown mode '{}'. Expected major, minor, harmonic minor, dorian, phrygian, lydian, mixolydian or locrian",
                s
            ))),
        }
    }
}

/// A key: tonic + mode. Defaults to C major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Key {
    pub tonic: PitchClass,
    pub mode: Mode,
}

impl Key {
    pub fn new(tonic: PitchClass, mode: Mode) -> Self {
        Key { tonic, mode }
    }

    pub fn major(tonic: PitchClass) -> Self {
        Key::new(tonic, Mode::Major)
    }

    pub fn minor(tonic: PitchClass) -> Self {
        Key::new(tonic, Mode::Minor)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}

impl FromStr for Key {
    type Err = EasyMidiError;

    /// Accepts `"C"`, `"Am"`, `"F# minor"`, `"Bb harmonic minor"`, `"D dorian"`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (tonic_part, mode_part) = match trimmed.split_once(char::is_whitespace) {
            Some((tonic, mode)) => (tonic, Some(mode)),
            None => (trimmed, None),
        };

        let (tonic_part, mode) = match mode_part {
            Some(mode) => (tonic_part, mode.parse::<Mode>()?),
            None if tonic_part.len() > 1 && tonic_part.ends_with('m') => {
                (&tonic_part[..tonic_part.len() - 1], Mode::Minor)
            }
            None => (tonic_part, Mode::Major),
        };

        Ok(Key::new(tonic_part.parse()?, mode))
    }
}
