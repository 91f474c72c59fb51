//! The top-level container: tracks plus file settings, written to one SMF

use crate::config::Config;
use crate::error::{EasyMidiError, Result};
use crate::models::Track;
use crate::renderers::midi::{render_tracks, MidiSink, SmfWriter};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct EasyMidi {
    config: Config,
    tracks: Vec<Track>,
}

impl EasyMidi {
    pub fn new() -> Self {
        EasyMidi::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(EasyMidi {
            config,
            tracks: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_tempo(&mut self, bpm: f64) -> Result<()> {
        let mut updated = self.config.clone();
        updated.tempo_bpm = bpm;
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub fn set_time_signature(&mut self, numerator: u8, denominator: u8) -> Result<()> {
        let mut updated = self.config.clone();
        updated.time_signature = (numerator, denominator);
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn add_tracks<I: IntoIterator<Item = Track>>(&mut self, tracks: I) {
        self.tracks.extend(tracks);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Feed every track into `sink`, in insertion order
    pub fn render<S: MidiSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        render_tracks(&self.tracks, &self.config, sink)
    }

    /// Encode all tracks as Standard MIDI File bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = SmfWriter::new(self.config.ticks_per_quarter)?;
        self.render(&mut writer)?;
        writer.serialize()
    }

    /// Write all tracks to `path` as a Standard MIDI File.
    ///
    /// The bytes go to a temporary file in the target directory which is then
    /// renamed over `path`, so a failed write never leaves a partial file.
    pub fn write_midi(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|e| EasyMidiError::write(path, e))?;
        file.write_all(&bytes)
            .map_err(|e| EasyMidiError::write(path, e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| EasyMidiError::write(path, e))?;
        file.persist(path)
            .map_err(|e| EasyMidiError::write(path, e.error))?;

        log::info!(
            "wrote {} ({} tracks, {} bytes)",
            path.display(),
            self.tracks.len(),
            bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, Rational};

    #[test]
    fn test_with_config_validates() {
        let config = Config {
            tempo_bpm: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            EasyMidi::with_config(config),
            Err(EasyMidiError::Configuration(_))
        ));
    }

    #[test]
    fn test_tempo_outside_set_tempo_range_rejected() {
        let slow = Config {
            tempo_bpm: 2.0,
            ..Config::default()
        };
        assert!(matches!(
            EasyMidi::with_config(slow),
            Err(EasyMidiError::Configuration(_))
        ));

        let mut midi = EasyMidi::new();
        assert!(midi.set_tempo(2.0).is_err());
        assert_eq!(midi.to_bytes().unwrap(), EasyMidi::new().to_bytes().unwrap());
    }

    #[test]
    fn test_setters_keep_old_value_on_error() {
        let mut midi = EasyMidi::new();
        midi.set_tempo(90.0).unwrap();
        assert!(midi.set_tempo(-1.0).is_err());
        assert_eq!(midi.config().tempo_bpm, 90.0);

        assert!(midi.set_time_signature(3, 5).is_err());
        assert_eq!(midi.config().time_signature, (4, 4));
        midi.set_time_signature(6, 8).unwrap();
        assert_eq!(midi.config().time_signature, (6, 8));
    }

    #[test]
    fn test_to_bytes_track_count() {
        let mut midi = EasyMidi::new();
        for program in [0, 40] {
            let mut track = Track::with_program(program).unwrap();
            track.add(Note::new("C", 4, Rational::new(1, 4), 80).unwrap());
            midi.add_track(track);
        }

        let bytes = midi.to_bytes().unwrap();
        let smf = midly::Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 3);
    }

    #[test]
    fn test_empty_file_has_conductor_only() {
        let bytes = EasyMidi::new().to_bytes().unwrap();
        let smf = midly::Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
    }
}
