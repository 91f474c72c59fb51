//! Error types for easy-midi
//!
//! Every fallible operation returns [`EasyMidiError`]. Construction errors
//! (parse, range, configuration, validation) surface immediately; write errors
//! only surface from `EasyMidi::write_midi`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EasyMidiError {
    /// Malformed pitch name or roman-numeral symbol
    #[error("parse error: {0}")]
    Parse(String),

    /// Pitch, duration, volume or channel outside its allowed range
    #[error("out of range: {0}")]
    Range(String),

    /// Unknown mode, instrument, or an impossible inversion
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Structurally invalid value (e.g. an empty chord)
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem failure while writing the MIDI file
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The SMF encoder rejected the event data
    #[error("midi encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, EasyMidiError>;

impl EasyMidiError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EasyMidiError::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_write_error_keeps_cause() {
        let err = EasyMidiError::write(
            "/nowhere/out.mid",
            io::Error::new(io::ErrorKind::NotFound, "missing dir"),
        );
        assert!(err.to_string().contains("/nowhere/out.mid"));
        assert_eq!(err.source().unwrap().to_string(), "missing dir");
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            EasyMidiError::Parse("bad token 'H'".into()).to_string(),
            "parse error: bad token 'H'"
        );
        assert_eq!(
            EasyMidiError::Validation("chord has no notes".into()).to_string(),
            "validation error: chord has no notes"
        );
    }
}
