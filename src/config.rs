//! Construction defaults
//!
//! All implicit values (octave, duration, volume, key, tempo, resolution)
//! live here instead of in module-level state. `Config::default()` matches
//! the documented constants; a JSON file can override any subset.

use crate::error::{EasyMidiError, Result};
use crate::models::Rational;
use crate::renderers::midi::defaults::{tempo_micros, DEFAULT_TEMPO_BPM, DEFAULT_TPQ, DEFAULT_VOLUME, MAX_TPQ};
use crate::theory::Key;
use serde::{Deserialize, Serialize};

/// Octave used when none is given (C4 = middle C)
pub const DEFAULT_OCTAVE: i8 = 4;

/// Quarter note, in whole-note units
pub fn default_duration() -> Rational {
    Rational::new(1, 4)
}

/// Defaults applied to notes and roman-numeral chords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteDefaults {
    pub octave: i8,
    /// Whole-note units (1/4 = quarter note)
    pub duration: Rational,
    /// 0-127
    pub volume: u8,
}

impl Default for NoteDefaults {
    fn default() -> Self {
        NoteDefaults {
            octave: DEFAULT_OCTAVE,
            duration: default_duration(),
            volume: DEFAULT_VOLUME,
        }
    }
}

/// File-level and construction-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub note: NoteDefaults,
    /// Key for roman-numeral chords
    pub key: Key,
    pub tempo_bpm: f64,
    /// SMF resolution, ticks per quarter note
    pub ticks_per_quarter: u16,
    /// (numerator, denominator), e.g. (3, 4)
    pub time_signature: (u8, u8),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            note: NoteDefaults::default(),
            key: Key::default(),
            tempo_bpm: DEFAULT_TEMPO_BPM,
            ticks_per_quarter: DEFAULT_TPQ,
            time_signature: (4, 4),
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| EasyMidiError::Configuration(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if tempo_micros(self.tempo_bpm).is_none() {
            return Err(EasyMidiError::Configuration(format!(
                "tempo {} BPM cannot be stored in a MIDI file (about 3.6 to 60,000,000 BPM)",
                self.tempo_bpm
            )));
        }
        check_tpq(self.ticks_per_quarter)?;
        let (num, den) = self.time_signature;
        if num == 0 || den == 0 || !den.is_power_of_two() {
            return Err(EasyMidiError::Configuration(format!(
                "invalid time signature {}/{}",
                num, den
            )));
        }
        if self.note.volume > 127 {
            return Err(EasyMidiError::Configuration(format!(
                "default volume must be 0-127, got {}",
                self.note.volume
            )));
        }
        if self.note.duration <= Rational::from_integer(0) {
            return Err(EasyMidiError::Configuration(
                "default duration must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ticks per quarter must fit the 15-bit SMF header field
pub fn check_tpq(tpq: u16) -> Result<()> {
    if tpq == 0 || tpq > MAX_TPQ {
        return Err(EasyMidiError::Configuration(format!(
            "ticks per quarter must be 1-{}, got {}",
            MAX_TPQ, tpq
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PitchClass;
    use crate::theory::Mode;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.note.octave, 4);
        assert_eq!(config.note.duration, Rational::new(1, 4));
        assert_eq!(config.note.volume, DEFAULT_VOLUME);
        assert_eq!(config.key, Key::default());
        assert_eq!(config.tempo_bpm, 120.0);
        assert_eq!(config.ticks_per_quarter, 480);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(
            r#"{ "tempo_bpm": 90.0, "key": { "tonic": "F#", "mode": "minor" } }"#,
        )
        .unwrap();
        assert_eq!(config.tempo_bpm, 90.0);
        assert_eq!(config.key, Key::new(PitchClass::Fs, Mode::Minor));
        assert_eq!(config.ticks_per_quarter, DEFAULT_TPQ);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{ "tempo_bpm": 0.0 }"#),
            Err(EasyMidiError::Configuration(_))
        ));
        assert!(Config::from_json(r#"{ "time_signature": [3, 5] }"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn test_tempo_must_fit_set_tempo_event() {
        let slow = Config {
            tempo_bpm: 2.0,
            ..Config::default()
        };
        assert!(matches!(slow.validate(), Err(EasyMidiError::Configuration(_))));

        let fast = Config {
            tempo_bpm: 1e9,
            ..Config::default()
        };
        assert!(fast.validate().is_err());

        let just_slow_enough = Config {
            tempo_bpm: 4.0,
            ..Config::default()
        };
        assert!(just_slow_enough.validate().is_ok());
    }

    #[test]
    fn test_ticks_per_quarter_range() {
        assert!(check_tpq(1).is_ok());
        assert!(check_tpq(MAX_TPQ).is_ok());
        assert!(check_tpq(0).is_err());
        assert!(matches!(
            check_tpq(0x8000),
            Err(EasyMidiError::Configuration(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = Config::default();
        config.note.duration = Rational::new(1, 8);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
