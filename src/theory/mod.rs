//! Music theory tables
//!
//! Scales are derived from each [`Mode`]'s interval pattern instead of a
//! hard-coded table per key, so every tonic/mode combination is covered.
//!
//! Degrees are 1-indexed. Degree 8 is the tonic one octave up, degree 10 the
//! third one octave up, and so on.

pub mod key;
pub mod resolver;

pub use key::{Key, Mode};
pub use resolver::{check_midi, resolve, split};

use crate::error::{EasyMidiError, Result};
use crate::models::PitchClass;

/// The seven pitch classes of a key, starting at the tonic
pub fn scale_of(key: Key) -> [PitchClass; 7] {
    let offsets = key.mode.offsets();
    let mut scale = [key.tonic; 7];
    for (slot, offset) in scale.iter_mut().zip(offsets) {
        *slot = key.tonic.transpose(offset as i32);
    }
    scale
}

/// Pitch class of a scale degree, plus how many octaves the degree wrapped
///
/// `degree_to_pitch_class(C major, 9)` is `(D, 1)`.
pub fn degree_to_pitch_class(key: Key, degree: u32) -> Result<(PitchClass, u32)> {
    let index = degree_index(degree)?;
    Ok((scale_of(key)[(index % 7) as usize], index / 7))
}

/// Absolute distance in semitones from the tonic up to a scale degree
///
/// Octave wrap is included, so degree 8 is always 12.
pub fn semitones_above_tonic(key: Key, degree: u32) -> Result<u32> {
    let index = degree_index(degree)?;
    let offsets = key.mode.offsets();
    Ok(12 * (index / 7) + offsets[(index % 7) as usize] as u32)
}

fn degree_index(degree: u32) -> Result<u32> {
    degree.checked_sub(1).ok_or_else(|| {
        EasyMidiError::Range("scale degrees start at 1".to_string())
    })
}

/// Major scales for all twelve tonics
pub fn major_scales() -> Vec<(PitchClass, [PitchClass; 7])> {
    scales_for(Mode::Major)
}

/// Natural minor scales for all twelve tonics
pub fn minor_scales() -> Vec<(PitchClass, [PitchClass; 7])> {
    scales_for(Mode::Minor)
}

fn scales_for(mode: Mode) -> Vec<(PitchClass, [PitchClass; 7])> {
    PitchClass::ALL
        .iter()
        .map(|&tonic| (tonic, scale_of(Key::new(tonic, mode))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use PitchClass::*;

    #[test]
    fn test_c_major_scale() {
        assert_eq!(scale_of(Key::default()), [C, D, E, F, G, A, B]);
    }

    #[test]
    fn test_sharp_and_flat_keys() {
        assert_eq!(scale_of(Key::major(D)), [D, E, Fs, G, A, B, Cs]);
        assert_eq!(scale_of(Key::major(F)), [F, G, A, As, C, D, E]);
        assert_eq!(scale_of(Key::major(Gs)), [Gs, As, C, Cs, Ds, F, G]);
    }

    #[test]
    fn test_minor_scales() {
        assert_eq!(scale_of(Key::minor(A)), [A, B, C, D, E, F, G]);
        assert_eq!(
            scale_of(Key::new(A, Mode::HarmonicMinor)),
            [A, B, C, D, E, F, Gs]
        );
    }

    #[test]
    fn test_degree_to_pitch_class_wraps() {
        let key = Key::default();
        assert_eq!(degree_to_pitch_class(key, 1).unwrap(), (C, 0));
        assert_eq!(degree_to_pitch_class(key, 7).unwrap(), (B, 0));
        assert_eq!(degree_to_pitch_class(key, 8).unwrap(), (C, 1));
        assert_eq!(degree_to_pitch_class(key, 9).unwrap(), (D, 1));
        assert_eq!(degree_to_pitch_class(key, 15).unwrap(), (C, 2));
        assert!(degree_to_pitch_class(key, 0).is_err());
    }

    #[test]
    fn test_semitones_above_tonic() {
        let key = Key::default();
        assert_eq!(semitones_above_tonic(key, 1).unwrap(), 0);
        assert_eq!(semitones_above_tonic(key, 5).unwrap(), 7);
        assert_eq!(semitones_above_tonic(key, 8).unwrap(), 12);
        assert_eq!(semitones_above_tonic(key, 10).unwrap(), 16);
    }

    #[test]
    fn test_scale_tables_cover_all_tonics() {
        let majors = major_scales();
        assert_eq!(majors.len(), 12);
        for (tonic, scale) in &majors {
            assert_eq!(scale[0], *tonic);
        }
        let minors = minor_scales();
        let (_, e_minor) = minors.iter().find(|(t, _)| *t == E).unwrap();
        assert_eq!(*e_minor, [E, Fs, G, A, B, C, D]);
    }
}
