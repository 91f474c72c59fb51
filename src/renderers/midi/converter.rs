//! Track-to-MIDI flattening
//!
//! Walks each track's timeline, flattens chords into their notes (all at the
//! chord's onset) and hands every sounding note to a [`MidiSink`].

use super::defaults::{assign_channel, MELODIC_CHANNELS};
use super::sink::{MidiSink, NoteEvent, TrackHeader};
use crate::config::Config;
use crate::error::{EasyMidiError, Result};
use crate::models::{Rational, Track};

/// Feed tempo, time signature and all tracks into `sink`
pub fn render_tracks<S: MidiSink + ?Sized>(tracks: &[Track], config: &Config, sink: &mut S) -> Result<()> {
    sink.set_tempo(config.tempo_bpm);
    let (numerator, denominator) = config.time_signature;
    sink.set_time_signature(numerator, denominator);

    for (index, track) in tracks.iter().enumerate() {
        let channel = match track.channel() {
            Some(channel) => channel,
            None => {
                if index >= MELODIC_CHANNELS {
                    log::warn!(
                        "track {} shares channel {} with an earlier track; set a channel explicitly to avoid program clashes",
                        index,
                        assign_channel(index)
                    );
                }
                assign_channel(index)
            }
        };

        let sink_track = sink.add_track(TrackHeader {
            name: track.instrument().name.to_string(),
            channel,
            program: track.program(),
        });

        let mut emitted = 0usize;
        for entry in track.timeline() {
            let (event, start) = entry?;
            let start_tick = whole_notes_to_ticks(start, config.ticks_per_quarter)?;
            for note in event.notes() {
                let Some(key) = note.midi_number() else {
                    continue; // rest
                };
                let duration_ticks =
                    whole_notes_to_ticks(note.duration(), config.ticks_per_quarter)?.max(1);
                sink.add_note(
                    sink_track,
                    NoteEvent {
                        key,
                        start_tick,
                        duration_ticks,
                        velocity: note.volume(),
                        channel: note.channel().unwrap_or(channel),
                    },
                )?;
                emitted += 1;
            }
        }

        log::debug!(
            "rendered track {} ({}, program {}, channel {}): {} notes",
            index,
            track.instrument().name,
            track.program(),
            channel,
            emitted
        );
    }

    Ok(())
}

/// Convert whole-note units to MIDI ticks, rounding to the nearest tick
///
/// A quarter note (1/4) is `tpq` ticks, so ticks = fraction * 4 * tpq.
pub fn whole_notes_to_ticks(fraction: Rational, tpq: u16) -> Result<u64> {
    if fraction < Rational::from_integer(0) {
        return Err(EasyMidiError::Range(format!(
            "negative time {} cannot be converted to ticks",
            fraction
        )));
    }
    let numerator = *fraction.numer() as u64;
    let denominator = *fraction.denom() as u64;
    let scaled = numerator * 4 * tpq as u64;
    Ok((scaled + denominator / 2) / denominator)
}
