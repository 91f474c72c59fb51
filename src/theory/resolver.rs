//! Pitch class + octave to MIDI note number
//!
//! Scientific pitch notation: C4 (middle C) = 60, C-1 = 0, G9 = 127.

use crate::error::{EasyMidiError, Result};
use crate::models::PitchClass;

pub const MIDI_MIN: i32 = 0;
pub const MIDI_MAX: i32 = 127;

/// Resolve a pitch class in an octave to its MIDI number.
///
/// Unlike a clamping conversion, anything outside 0-127 is an error.
pub fn resolve(pitch_class: PitchClass, octave: i8) -> Result<u8> {
    let midi = 12 * (octave as i32 + 1) + pitch_class.semitone() as i32;
    check_midi(midi).map_err(|_| {
        EasyMidiError::Range(format!(
            "{}{} resolves to MIDI {}, outside 0-127",
            pitch_class, octave, midi
        ))
    })
}

/// Validate a raw MIDI number computed elsewhere (e.g. chord tone arithmetic)
pub fn check_midi(midi: i32) -> Result<u8> {
    if (MIDI_MIN..=MIDI_MAX).contains(&midi) {
        Ok(midi as u8)
    } else {
        Err(EasyMidiError::Range(format!(
            "MIDI note {} is outside 0-127",
            midi
        )))
    }
}

/// Inverse of [`resolve`]: split a MIDI number into pitch class and octave
pub fn split(midi: u8) -> (PitchClass, i8) {
    let midi = midi as i32;
    (PitchClass::from_semitone(midi), (midi / 12 - 1) as i8)
}
