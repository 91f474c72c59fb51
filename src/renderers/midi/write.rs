//! Standard MIDI File writer backed by midly
//!
//! Output is SMF Format 1: track 0 holds the tempo and time signature map,
//! tracks 1+ hold one instrument each (name, program change, notes).

use super::defaults::{tempo_micros, DEFAULT_TEMPO_BPM};
use super::sink::{MidiSink, NoteEvent, TrackHeader};
use crate::config::check_tpq;
use crate::error::{EasyMidiError, Result};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

/// Largest value a variable-length delta can hold
const MAX_TICK: u64 = 0x0FFF_FFFF;

#[derive(Debug, Clone, PartialEq)]
struct Part {
    header: TrackHeader,
    notes: Vec<NoteEvent>,
}

/// Collects tracks and notes, then encodes them with midly
#[derive(Debug, Clone, PartialEq)]
pub struct SmfWriter {
    tpq: u16,
    tempo_bpm: f64,
    time_signature: (u8, u8),
    parts: Vec<Part>,
}

impl SmfWriter {
    /// `tpq` must be 1-32767, the range of the SMF header field
    pub fn new(tpq: u16) -> Result<Self> {
        check_tpq(tpq)?;
        Ok(SmfWriter {
            tpq,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            time_signature: (4, 4),
            parts: Vec::new(),
        })
    }

    pub fn track_count(&self) -> usize {
        self.parts.len()
    }
}

impl MidiSink for SmfWriter {
    fn set_tempo(&mut self, bpm: f64) {
        self.tempo_bpm = bpm;
    }

    fn set_time_signature(&mut self, numerator: u8, denominator: u8) {
        self.time_signature = (numerator, denominator);
    }

    fn add_track(&mut self, header: TrackHeader) -> usize {
        self.parts.push(Part {
            header,
            notes: Vec::new(),
        });
        self.parts.len() - 1
    }

    fn add_note(&mut self, track: usize, note: NoteEvent) -> Result<()> {
        if note.key > 127 || note.velocity > 127 || note.channel > 15 {
            return Err(EasyMidiError::Range(format!(
                "note event out of MIDI range: {:?}",
                note
            )));
        }
        if note.start_tick + note.duration_ticks > MAX_TICK {
            return Err(EasyMidiError::Encode(format!(
                "note ends at tick {}, beyond the SMF limit of {}",
                note.start_tick + note.duration_ticks,
                MAX_TICK
            )));
        }
        let part = self.parts.get_mut(track).ok_or_else(|| {
            EasyMidiError::Validation(format!("no track with index {}", track))
        })?;
        part.notes.push(note);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let micros = tempo_micros(self.tempo_bpm).ok_or_else(|| {
            EasyMidiError::Configuration(format!(
                "tempo {} BPM cannot be stored in a Set Tempo event",
                self.tempo_bpm
            ))
        })?;
        let mut tracks = Vec::with_capacity(self.parts.len() + 1);

        // Track 0: Tempo and time signature map
        tracks.push(self.build_conductor_track(micros));

        // Tracks 1+: One per instrument track
        for part in &self.parts {
            tracks.push(build_part_track(part));
        }

        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing: Timing::Metrical(self.tpq.into()),
            },
            tracks,
        };

        let mut out = Vec::new();
        smf.write(&mut out)
            .map_err(|e| EasyMidiError::Encode(format!("Failed to write MIDI: {}", e)))?;
        Ok(out)
    }
}

impl SmfWriter {
    fn build_conductor_track<'a>(&self, microseconds_per_quarter: u32) -> Track<'a> {
        let (numerator, denominator) = self.time_signature;
        // Denominator as power of 2 (e.g., 4 -> 2, 8 -> 3)
        let denominator_power = denominator.max(1).trailing_zeros() as u8;

        vec![
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter.into())),
            },
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                    numerator,
                    denominator_power,
                    24, // MIDI clocks per metronome click
                    8,  // 32nd notes per quarter note
                )),
            },
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            },
        ]
    }
}

fn build_part_track(part: &Part) -> Track<'_> {
    let mut events = Vec::with_capacity(part.notes.len() * 2 + 3);

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(part.header.name.as_bytes())),
    });

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Midi {
            channel: part.header.channel.into(),
            message: MidiMessage::ProgramChange {
                program: part.header.program.into(),
            },
        },
    });

    for note in &part.notes {
        events.push(TrackEvent {
            delta: (note.start_tick as u32).into(),
            kind: TrackEventKind::Midi {
                channel: note.channel.into(),
                message: MidiMessage::NoteOn {
                    key: note.key.into(),
                    vel: note.velocity.into(),
                },
            },
        });

        events.push(TrackEvent {
            delta: ((note.start_tick + note.duration_ticks) as u32).into(),
            kind: TrackEventKind::Midi {
                channel: note.channel.into(),
                message: MidiMessage::NoteOff {
                    key: note.key.into(),
                    vel: 0.into(),
                },
            },
        });
    }

    // Sort by absolute tick; at equal ticks release notes before starting new ones
    events.sort_by_key(|e| (e.delta.as_int(), event_rank(&e.kind)));

    convert_to_delta_times(&mut events);

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    events
}

fn event_rank(kind: &TrackEventKind) -> u8 {
    match kind {
        TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. } => 1,
        TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. } => 2,
        _ => 0,
    }
}

/// Convert absolute tick times to delta times (time since previous event)
fn convert_to_delta_times(events: &mut [TrackEvent]) {
    let mut prev_tick = 0u32;
    for event in events.iter_mut() {
        let current_tick = event.delta.as_int();
        let delta = current_tick.saturating_sub(prev_tick);
        event.delta = delta.into();
        prev_tick = current_tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piano() -> TrackHeader {
        TrackHeader {
            name: "Acoustic Grand Piano".to_string(),
            channel: 0,
            program: 0,
        }
    }

    fn note(key: u8, start_tick: u64, duration_ticks: u64) -> NoteEvent {
        NoteEvent {
            key,
            start_tick,
            duration_ticks,
            velocity: 64,
            channel: 0,
        }
    }

    /// (absolute tick, message) for every channel event of a track
    fn messages(smf: &Smf, track: usize) -> Vec<(u32, MidiMessage)> {
        let mut tick = 0;
        smf.tracks[track]
            .iter()
            .filter_map(|e| {
                tick += e.delta.as_int();
                match e.kind {
                    TrackEventKind::Midi { message, .. } => Some((tick, message)),
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn test_header_and_part_tracks() {
        let mut writer = SmfWriter::new(96).unwrap();
        let first = writer.add_track(piano());
        let second = writer.add_track(TrackHeader {
            name: "Violin".to_string(),
            channel: 1,
            program: 40,
        });
        writer.add_note(first, note(60, 0, 96)).unwrap();
        writer
            .add_note(second, NoteEvent { channel: 1, ..note(64, 0, 48) })
            .unwrap();
        assert_eq!(writer.track_count(), 2);

        let out = writer.serialize().unwrap();
        let smf = Smf::parse(&out).unwrap();
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(96.into()));
        assert_eq!(smf.tracks.len(), 3);

        assert!(matches!(
            smf.tracks[2][0].kind,
            TrackEventKind::Meta(MetaMessage::TrackName(b"Violin"))
        ));
        assert!(matches!(
            smf.tracks[2][1].kind,
            TrackEventKind::Midi { channel, message: MidiMessage::ProgramChange { program } }
                if channel.as_int() == 1 && program.as_int() == 40
        ));
        assert!(smf.tracks.iter().all(|track| matches!(
            track.last().map(|e| e.kind),
            Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
        )));
    }

    #[test]
    fn test_chord_notes_share_onset() {
        let mut writer = SmfWriter::new(480).unwrap();
        let track = writer.add_track(piano());
        for key in [60, 64, 67] {
            writer.add_note(track, note(key, 0, 480)).unwrap();
        }

        let out = writer.serialize().unwrap();
        let smf = Smf::parse(&out).unwrap();
        let ons: Vec<u32> = messages(&smf, 1)
            .into_iter()
            .filter(|(_, m)| matches!(m, MidiMessage::NoteOn { .. }))
            .map(|(tick, _)| tick)
            .collect();
        assert_eq!(ons, vec![0, 0, 0]);
    }

    #[test]
    fn test_gaps_become_delta_times() {
        let mut writer = SmfWriter::new(480).unwrap();
        let track = writer.add_track(piano());
        writer.add_note(track, note(60, 0, 240)).unwrap();
        writer.add_note(track, note(62, 960, 480)).unwrap();

        let out = writer.serialize().unwrap();
        let smf = Smf::parse(&out).unwrap();
        let deltas: Vec<u32> = smf.tracks[1]
            .iter()
            .filter(|e| matches!(e.kind, TrackEventKind::Midi { message: MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. }, .. }))
            .map(|e| e.delta.as_int())
            .collect();
        // on 0, off 240, on 960, off 1440
        assert_eq!(deltas, vec![0, 240, 720, 480]);
    }

    #[test]
    fn test_repeated_pitch_releases_before_restrike() {
        let mut writer = SmfWriter::new(480).unwrap();
        let track = writer.add_track(piano());
        writer.add_note(track, note(60, 0, 480)).unwrap();
        writer.add_note(track, note(60, 480, 480)).unwrap();

        let out = writer.serialize().unwrap();
        let smf = Smf::parse(&out).unwrap();
        let messages: Vec<MidiMessage> = messages(&smf, 1).into_iter().map(|(_, m)| m).collect();
        assert!(matches!(messages[0], MidiMessage::ProgramChange { .. }));
        assert!(matches!(messages[1], MidiMessage::NoteOn { .. }));
        assert!(matches!(messages[2], MidiMessage::NoteOff { .. }));
        assert!(matches!(messages[3], MidiMessage::NoteOn { .. }));
        assert!(matches!(messages[4], MidiMessage::NoteOff { .. }));
    }

    #[test]
    fn test_tempo_in_conductor_track() {
        let mut writer = SmfWriter::new(480).unwrap();
        writer.set_tempo(90.0);
        writer.set_time_signature(3, 4);

        let out = writer.serialize().unwrap();
        let smf = Smf::parse(&out).unwrap();
        assert!(smf.tracks[0].iter().any(|e| matches!(
            e.kind,
            TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == 666_667
        )));
        assert!(smf.tracks[0].iter().any(|e| matches!(
            e.kind,
            TrackEventKind::Meta(MetaMessage::TimeSignature(3, 2, 24, 8))
        )));
    }

    #[test]
    fn test_unrepresentable_tempo_is_rejected() {
        let mut writer = SmfWriter::new(480).unwrap();
        writer.set_tempo(2.0);
        assert!(matches!(
            writer.serialize(),
            Err(EasyMidiError::Configuration(_))
        ));
    }

    #[test]
    fn test_resolution_must_fit_header() {
        assert!(SmfWriter::new(0x7FFF).is_ok());
        assert!(matches!(
            SmfWriter::new(0x8000),
            Err(EasyMidiError::Configuration(_))
        ));
        assert!(SmfWriter::new(0).is_err());
    }

    #[test]
    fn test_add_note_validation() {
        let mut writer = SmfWriter::new(480).unwrap();
        assert!(matches!(
            writer.add_note(0, note(60, 0, 480)),
            Err(EasyMidiError::Validation(_))
        ));
        let track = writer.add_track(piano());
        assert!(writer.add_note(track, note(128, 0, 480)).is_err());
        assert!(writer.add_note(track, note(60, MAX_TICK, 1)).is_err());
    }
}
