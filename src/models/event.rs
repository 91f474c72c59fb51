//! Track events: a single note or a chord

use crate::models::{Chord, Note, Rational};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Note(Note),
    Chord(Chord),
}

impl Event {
    /// How far this event advances the track clock
    pub fn duration(&self) -> Rational {
        match self {
            Event::Note(note) => note.duration(),
            Event::Chord(chord) => chord.duration(),
        }
    }

    /// The notes sounded at this event's onset
    pub fn notes(&self) -> &[Note] {
        match self {
            Event::Note(note) => std::slice::from_ref(note),
            Event::Chord(chord) => chord.notes(),
        }
    }
}

impl From<Note> for Event {
    fn from(note: Note) -> Self {
        Event::Note(note)
    }
}

impl From<Chord> for Event {
    fn from(chord: Chord) -> Self {
        Event::Chord(chord)
    }
}

impl From<&Note> for Event {
    fn from(note: &Note) -> Self {
        Event::Note(note.clone())
    }
}

impl From<&Chord> for Event {
    fn from(chord: &Chord) -> Self {
        Event::Chord(chord.clone())
    }
}
