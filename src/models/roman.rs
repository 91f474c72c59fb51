//! Roman-numeral chords
//!
//! Resolution runs in three steps: tokenize the symbol, compute chord tones as
//! semitone distances above the root, then place them above the root note at
//! the requested octave and apply inversions.
//!
//! Quality rules:
//! - The triad is stacked from the key's scale (root, diatonic third, diatonic fifth).
//! - Uppercase numerals force a major third, lowercase a minor third. The fifth
//!   stays diatonic, so `vii` in C major is B-D-F.
//! - Explicit modifiers override both: `-` (diminished), `+` (augmented),
//!   `sus2`/`sus4` (diatonic 2nd/4th instead of the third), `maj7`, `dom7`,
//!   `min7`. A bare number adds that diatonic interval (`V7`, `I8`).

use crate::config::Config;
use crate::error::{EasyMidiError, Result};
use crate::models::{Chord, Event, Note, Rational};
use crate::parse::roman_numeral::{self, Modifier, NumeralCase, RomanSymbol};
use crate::theory::{self, resolver, Key};

const MAJOR_THIRD: i32 = 4;
const MINOR_THIRD: i32 = 3;
const DIMINISHED_FIFTH: i32 = 6;
const AUGMENTED_FIFTH: i32 = 8;
const MINOR_SEVENTH: i32 = 10;
const MAJOR_SEVENTH: i32 = 11;
const OCTAVE: i32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct RomanChord {
    numeral: String,
    symbol: RomanSymbol,
    key: Key,
    /// Octave of the root in root position
    octave: i8,
    duration: Rational,
    volume: u8,
    chord: Chord,
}

impl RomanChord {
    pub fn new(numeral: &str, key: Key, octave: i8, duration: Rational, volume: u8) -> Result<Self> {
        let symbol = roman_numeral::tokenize(numeral)?;
        let chord = build_chord(&symbol, key, octave, duration, volume)?;
        Ok(RomanChord {
            numeral: numeral.trim().to_string(),
            symbol,
            key,
            octave,
            duration,
            volume,
            chord,
        })
    }

    /// Resolve with the defaults from [`Config::default`] (C major, octave 4, quarter note)
    pub fn parse(numeral: &str) -> Result<Self> {
        RomanChord::with_config(numeral, &Config::default())
    }

    pub fn with_config(numeral: &str, config: &Config) -> Result<Self> {
        RomanChord::new(
            numeral,
            config.key,
            config.note.octave,
            config.note.duration,
            config.note.volume,
        )
    }

    /// Override the inversion count given by trailing `*`s
    pub fn with_inversion(mut self, inversion: u8) -> Result<Self> {
        self.symbol.inversion = inversion;
        self.rebuild()?;
        Ok(self)
    }

    /// Re-resolve the chord in another key
    pub fn set_key(&mut self, key: Key) -> Result<()> {
        let previous = self.key;
        self.key = key;
        if let Err(err) = self.rebuild() {
            self.key = previous;
            return Err(err);
        }
        Ok(())
    }

    fn rebuild(&mut self) -> Result<()> {
        self.chord = build_chord(&self.symbol, self.key, self.octave, self.duration, self.volume)?;
        Ok(())
    }

    pub fn numeral(&self) -> &str {
        &self.numeral
    }

    pub fn degree(&self) -> u8 {
        self.symbol.degree
    }

    pub fn inversion(&self) -> u8 {
        self.symbol.inversion
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn notes(&self) -> &[Note] {
        self.chord.notes()
    }

    pub fn into_chord(self) -> Chord {
        self.chord
    }
}

impl From<RomanChord> for Chord {
    fn from(roman: RomanChord) -> Self {
        roman.chord
    }
}

impl From<RomanChord> for Event {
    fn from(roman: RomanChord) -> Self {
        Event::Chord(roman.chord)
    }
}

fn build_chord(symbol: &RomanSymbol, key: Key, octave: i8, duration: Rational, volume: u8) -> Result<Chord> {
    let tones = chord_tones(symbol, key)?;

    let (root, _) = theory::degree_to_pitch_class(key, symbol.degree as u32)?;
    let root_midi = resolver::resolve(root, octave)? as i32;

    let mut notes: Vec<Note> = Vec::with_capacity(tones.len());
    for tone in tones {
        let midi = resolver::check_midi(root_midi + tone)?;
        let note = Note::from_midi(midi, duration, volume)?;
        if !notes.contains(&note) {
            notes.push(note);
        }
    }
    notes.sort_by_key(|n| n.midi_number());

    let notes = invert(notes, symbol.inversion)?;
    log::debug!(
        "resolved {:?} in {} to [{}]",
        symbol,
        key,
        notes.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
    );
    Chord::new(notes)
}

/// Semitone distances above the root, root first
fn chord_tones(symbol: &RomanSymbol, key: Key) -> Result<Vec<i32>> {
    let root_degree = symbol.degree as u32;
    let root_offset = theory::semitones_above_tonic(key, root_degree)? as i32;
    let diatonic = |interval: u8| -> Result<i32> {
        let degree = root_degree + interval as u32 - 1;
        Ok(theory::semitones_above_tonic(key, degree)? as i32 - root_offset)
    };

    let third = match symbol.case {
        NumeralCase::Upper => MAJOR_THIRD,
        NumeralCase::Lower => MINOR_THIRD,
    };
    let mut tones = vec![0, third, diatonic(5)?];

    match symbol.modifier {
        None => {}
        Some(Modifier::Diminished) => tones = vec![0, MINOR_THIRD, DIMINISHED_FIFTH],
        Some(Modifier::Augmented) => tones = vec![0, MAJOR_THIRD, AUGMENTED_FIFTH],
        Some(Modifier::Sus2) => tones[1] = diatonic(2)?,
        Some(Modifier::Sus4) => tones[1] = diatonic(4)?,
        Some(Modifier::MajorSeventh) => tones.push(MAJOR_SEVENTH),
        Some(Modifier::DominantSeventh) => {
            tones[1] = MAJOR_THIRD;
            tones.push(MINOR_SEVENTH);
        }
        Some(Modifier::MinorSeventh) => {
            tones[1] = MINOR_THIRD;
            tones.push(MINOR_SEVENTH);
        }
        Some(Modifier::Added(interval)) => tones.push(diatonic(interval)?),
    }
    Ok(tones)
}

/// Move the lowest note up an octave, `count` times. `notes` must be sorted
/// low to high.
///
/// When the raised note already exists (e.g. `I8`: C E G C), the next lowest
/// note is raised as well so the chord keeps its size.
fn invert(mut notes: Vec<Note>, count: u8) -> Result<Vec<Note>> {
    let size = notes.len();
    if count as usize >= size.max(1) {
        return Err(EasyMidiError::Configuration(format!(
            "a {}-note chord allows at most {} inversions, got {}",
            size,
            size.saturating_sub(1),
            count
        )));
    }

    for _ in 0..count {
        let lowest = notes.remove(0);
        let mut raised = vec![lowest.transpose(OCTAVE)?];
        let mut next = 0;
        while notes.len() + dedup_len(&notes, &raised) < size && next < notes.len() {
            raised.push(notes[next].transpose(OCTAVE)?);
            next += 1;
        }
        for note in raised {
            if !notes.contains(&note) {
                notes.push(note);
            }
        }
        notes.sort_by_key(|n| n.midi_number());
    }
    Ok(notes)
}

/// How many of `raised` would be new, distinct additions to `notes`
fn dedup_len(notes: &[Note], raised: &[Note]) -> usize {
    raised
        .iter()
        .enumerate()
        .filter(|&(i, n)| !notes.contains(n) && !raised[..i].contains(n))
        .count()
}
