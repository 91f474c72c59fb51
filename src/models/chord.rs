//! Chords: notes that share one onset
//!
//! A chord behaves like an ordered set. Insertion order is kept for emission
//! and equality ignores order. Two members never share a key on the same
//! channel: a note that would sound an existing key merges into it, keeping
//! whichever of the two lasts longer.

use crate::error::{EasyMidiError, Result};
use crate::models::{Event, Note, Rational};

#[derive(Debug, Clone)]
pub struct Chord {
    notes: Vec<Note>,
}

impl Chord {
    /// Build a chord from notes and/or nested chords (flattened).
    ///
    /// ```rust,ignore
    /// let c_major = Chord::new([Note::parse("C")?, Note::parse("E")?, Note::parse("G")?])?;
    /// ```
    pub fn new<I, E>(items: I) -> Result<Chord>
    where
        I: IntoIterator<Item = E>,
        E: Into<Event>,
    {
        let mut notes = Vec::new();
        for item in items {
            match item.into() {
                Event::Note(note) => push_unique(&mut notes, note),
                Event::Chord(chord) => {
                    for note in chord.notes {
                        push_unique(&mut notes, note);
                    }
                }
            }
        }

        if notes.is_empty() {
            return Err(EasyMidiError::Validation(
                "a chord needs at least one note".to_string(),
            ));
        }
        Ok(Chord { notes })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Never true for a chord built through `Chord::new`
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Duration of the longest note
    pub fn duration(&self) -> Rational {
        self.notes
            .iter()
            .map(Note::duration)
            .max()
            .unwrap_or_else(|| Rational::from_integer(0))
    }

    /// Volume of the loudest note
    pub fn volume(&self) -> u8 {
        self.notes.iter().map(Note::volume).max().unwrap_or(0)
    }

    pub fn contains(&self, note: &Note) -> bool {
        self.notes.contains(note)
    }

    /// Add a note; one on a key already sounding merges with it
    pub fn add_note(&mut self, note: Note) {
        push_unique(&mut self.notes, note);
    }

    /// Remove a note. Fails if the note is missing or is the last one left.
    pub fn remove_note(&mut self, note: &Note) -> Result<()> {
        let index = self
            .notes
            .iter()
            .position(|n| n == note)
            .ok_or_else(|| EasyMidiError::Validation(format!("{} is not in the chord", note)))?;
        if self.notes.len() == 1 {
            return Err(EasyMidiError::Validation(
                "cannot remove the last note of a chord".to_string(),
            ));
        }
        self.notes.remove(index);
        Ok(())
    }

    /// Override the duration of every note
    pub fn set_duration(&mut self, duration: Rational) -> Result<()> {
        self.update_each(|note| note.set_duration(duration))
    }

    pub fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.update_each(|note| note.set_volume(volume))
    }

    /// Move every note into the same octave
    pub fn set_octave(&mut self, octave: i8) -> Result<()> {
        self.update_each(|note| note.set_octave(octave))
    }

    pub fn set_channel(&mut self, channel: Option<u8>) -> Result<()> {
        self.update_each(|note| note.set_channel(channel))
    }

    pub fn transpose(&self, semitones: i32) -> Result<Chord> {
        let notes = self
            .notes
            .iter()
            .map(|note| note.transpose(semitones))
            .collect::<Result<Vec<_>>>()?;
        Chord::new(notes)
    }

    /// All-or-nothing update: either every note accepts the change or none does
    fn update_each(&mut self, mut change: impl FnMut(&mut Note) -> Result<()>) -> Result<()> {
        let mut updated = Vec::with_capacity(self.notes.len());
        for note in &self.notes {
            let mut note = note.clone();
            change(&mut note)?;
            push_unique(&mut updated, note);
        }
        self.notes = updated;
        Ok(())
    }
}

fn push_unique(notes: &mut Vec<Note>, note: Note) {
    match notes.iter_mut().find(|n| same_key(n, &note)) {
        Some(existing) if note.duration() > existing.duration() => *existing = note,
        Some(_) => {}
        None => notes.push(note),
    }
}

/// Same sounding key on the same channel (rests all count as one key)
fn same_key(a: &Note, b: &Note) -> bool {
    a.midi_number() == b.midi_number() && a.channel() == b.channel()
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.notes.len() == other.notes.len() && self.notes.iter().all(|n| other.contains(n))
    }
}
