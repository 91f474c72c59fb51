//! Pitch-name tokenizer
//!
//! Turns tokens like `"C"`, `"F#"`, `"Bb"` or `"R"` into an explicit
//! [`PitchToken`]. Mapping the token to a semitone is a separate, pure step
//! (see [`PitchToken::semitone`]), so no string matching leaks past this module.

use crate::error::{EasyMidiError, Result};

/// Natural note letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    /// Semitones above C
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

impl Accidental {
    fn from_suffix(suffix: &str) -> Option<Accidental> {
        match suffix {
            "" => Some(Accidental::Natural),
            "#" | "♯" => Some(Accidental::Sharp),
            "b" | "♭" => Some(Accidental::Flat),
            "##" | "x" => Some(Accidental::DoubleSharp),
            "bb" => Some(Accidental::DoubleFlat),
            _ => None,
        }
    }

    pub fn offset(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
            Accidental::DoubleSharp => 2,
            Accidental::DoubleFlat => -2,
        }
    }
}

/// A tokenized note name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchToken {
    Pitched { letter: Letter, accidental: Accidental },
    Rest,
}

impl PitchToken {
    /// Semitone offset 0-11 within the octave, `None` for a rest.
    ///
    /// Enharmonic spellings that cross the octave line (`Cb`, `B#`) wrap
    /// around; the octave number of the note is left untouched.
    pub fn semitone(self) -> Option<u8> {
        match self {
            PitchToken::Rest => None,
            PitchToken::Pitched { letter, accidental } => {
                let raw = letter.semitone() as i8 + accidental.offset();
                Some(raw.rem_euclid(12) as u8)
            }
        }
    }
}

/// Tokenize a note name such as `"C"`, `"c#"`, `"Eb"` or `"R"` (rest).
pub fn tokenize(input: &str) -> Result<PitchToken> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("r") || trimmed.eq_ignore_ascii_case("rest") {
        return Ok(PitchToken::Rest);
    }

    let mut chars = trimmed.chars();
    let letter = chars
        .next()
        .and_then(Letter::from_char)
        .ok_or_else(|| invalid(input))?;
    let accidental = Accidental::from_suffix(chars.as_str()).ok_or_else(|| invalid(input))?;

    Ok(PitchToken::Pitched { letter, accidental })
}

fn invalid(input: &str) -> EasyMidiError {
    EasyMidiError::Parse(format!(
        "invalid note name '{}'. Expected C, C#, Db, D, D#, Eb, E, F, F#, Gb, G, G#, Ab, A, A#, Bb, B or R (rest)",
        input
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_naturals() {
        assert_eq!(
            tokenize("C").unwrap(),
            PitchToken::Pitched { letter: Letter::C, accidental: Accidental::Natural }
        );
        assert_eq!(tokenize("g").unwrap().semitone(), Some(7));
    }

    #[test]
    fn test_tokenize_accidentals() {
        assert_eq!(tokenize("F#").unwrap().semitone(), Some(6));
        assert_eq!(tokenize("Gb").unwrap().semitone(), Some(6));
        assert_eq!(tokenize("Bb").unwrap().semitone(), Some(10));
        assert_eq!(tokenize("C##").unwrap().semitone(), Some(2));
        assert_eq!(tokenize("Ebb").unwrap().semitone(), Some(2));
    }

    #[test]
    fn test_enharmonic_wrap() {
        assert_eq!(tokenize("Cb").unwrap().semitone(), Some(11));
        assert_eq!(tokenize("B#").unwrap().semitone(), Some(0));
    }

    #[test]
    fn test_rest() {
        assert_eq!(tokenize("R").unwrap(), PitchToken::Rest);
        assert_eq!(tokenize("R").unwrap().semitone(), None);
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(matches!(tokenize("H"), Err(EasyMidiError::Parse(_))));
        assert!(tokenize("").is_err());
        assert!(tokenize("C#b").is_err());
        assert!(tokenize("C###").is_err());
    }
}
