//! Tracks: an instrument plus an ordered list of notes and chords
//!
//! Events carry no explicit start time. Each one starts when every earlier
//! event on the track has finished; [`Track::timeline`] computes those onsets
//! on demand.
//!
//! Onsets are exact fractions. A run of durations whose sum no longer fits the
//! fraction type is reported as a range error rather than wrapped.

use crate::error::{EasyMidiError, Result};
use crate::models::{checked_add, Event, Instrument, Rational};
use std::slice;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    instrument: Instrument,
    /// Fixed channel; `None` lets `EasyMidi` assign one by track position
    channel: Option<u8>,
    events: Vec<Event>,
}

impl Track {
    /// Create a track for a General MIDI instrument name (see [`Instrument::lookup`])
    pub fn new(instrument: &str) -> Result<Track> {
        Ok(Track::for_instrument(Instrument::lookup(instrument)?))
    }

    /// Create a track for a program number, skipping name lookup
    pub fn with_program(program: u8) -> Result<Track> {
        let instrument = Instrument::from_program(program).ok_or_else(|| {
            EasyMidiError::Configuration(format!("program must be 0-127, got {}", program))
        })?;
        Ok(Track::for_instrument(instrument))
    }

    pub fn for_instrument(instrument: Instrument) -> Track {
        Track {
            instrument,
            channel: None,
            events: Vec::new(),
        }
    }

    /// Append a single note, chord or roman-numeral chord
    pub fn add<E: Into<Event>>(&mut self, event: E) {
        self.events.push(event.into());
    }

    /// Append a sequence of notes and chords, keeping their order
    pub fn add_notes<I, E>(&mut self, events: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Event>,
    {
        self.events.extend(events.into_iter().map(Into::into));
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every event paired with its start time (whole-note units).
    ///
    /// Each call starts a fresh walk from time zero. If the running total
    /// overflows, the walk yields one error and then ends.
    pub fn timeline(&self) -> Timeline<'_> {
        Timeline {
            events: self.events.iter(),
            clock: Some(Rational::from_integer(0)),
        }
    }

    /// Total length of the track
    pub fn duration(&self) -> Result<Rational> {
        self.events
            .iter()
            .try_fold(Rational::from_integer(0), |total, event| {
                checked_add(total, event.duration()).ok_or_else(|| overflow(total, event))
            })
    }

    /// Number of sounding notes once chords are flattened (rests excluded)
    pub fn note_count(&self) -> usize {
        self.events
            .iter()
            .flat_map(Event::notes)
            .filter(|note| !note.is_rest())
            .count()
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn program(&self) -> u8 {
        self.instrument.program
    }

    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    pub fn set_channel(&mut self, channel: u8) -> Result<()> {
        if channel > 15 {
            return Err(EasyMidiError::Range(format!(
                "channel must be 0-15, got {}",
                channel
            )));
        }
        self.channel = Some(channel);
        Ok(())
    }
}

fn overflow(total: Rational, event: &Event) -> EasyMidiError {
    EasyMidiError::Range(format!(
        "track time {} + {} is too fine-grained to represent exactly",
        total,
        event.duration()
    ))
}

/// Iterator over `(event, start)` pairs of a track
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    events: slice::Iter<'a, Event>,
    /// `None` once the clock has overflowed
    clock: Option<Rational>,
}

impl<'a> Iterator for Timeline<'a> {
    type Item = Result<(&'a Event, Rational)>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.clock?;
        let event = self.events.next()?;
        match checked_add(start, event.duration()) {
            Some(next) => self.clock = Some(next),
            None => {
                self.clock = None;
                // The last event's end is never needed as an onset
                if !self.events.as_slice().is_empty() {
                    return Some(Err(overflow(start, event)));
                }
            }
        }
        Some(Ok((event, start)))
    }
}
