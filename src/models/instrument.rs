//! General MIDI instrument table
//!
//! Lookup policy for instrument names:
//! 1. exact match (case-insensitive, punctuation ignored) wins;
//! 2. otherwise the closest name by per-word similarity is used and a warning
//!    is logged (`"acoustic grand"` → Acoustic Grand Piano);
//! 3. a name too far from every instrument is a configuration error.

use crate::error::{EasyMidiError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Average per-word similarity below which a fuzzy match is rejected
pub const MIN_SIMILARITY: f64 = 0.5;

/// General MIDI level 1 program names, indexed by program number (0-127)
pub const GM_INSTRUMENTS: [&str; 128] = [
    // Piano
    "Acoustic Grand Piano", "Bright Acoustic Piano", "Electric Grand Piano", "Honky-tonk Piano",
    "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavinet",
    // Chromatic percussion
    "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
    "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
    // Organ
    "Drawbar Organ", "Percussive Organ", "Rock Organ", "Church Organ",
    "Reed Organ", "Accordion", "Harmonica", "Tango Accordion",
    // Guitar
    "Acoustic Guitar (nylon)", "Acoustic Guitar (steel)", "Electric Guitar (jazz)", "Electric Guitar (clean)",
    "Electric Guitar (muted)", "Overdriven Guitar", "Distortion Guitar", "Guitar Harmonics",
    // Bass
    "Acoustic Bass", "Electric Bass (finger)", "Electric Bass (pick)", "Fretless Bass",
    "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
    // Strings
    "Violin", "Viola", "Cello", "Contrabass",
    "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
    // Ensemble
    "String Ensemble 1", "String Ensemble 2", "Synth Strings 1", "Synth Strings 2",
    "Choir Aahs", "Voice Oohs", "Synth Choir", "Orchestra Hit",
    // Brass
    "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
    "French Horn", "Brass Section", "Synth Brass 1", "Synth Brass 2",
    // Reed
    "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
    "Oboe", "English Horn", "Bassoon", "Clarinet",
    // Pipe
    "Piccolo", "Flute", "Recorder", "Pan Flute",
    "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
    // Synth lead
    "Lead 1 (square)", "Lead 2 (sawtooth)", "Lead 3 (calliope)", "Lead 4 (chiff)",
    "Lead 5 (charang)", "Lead 6 (voice)", "Lead 7 (fifths)", "Lead 8 (bass + lead)",
    // Synth pad
    "Pad 1 (new age)", "Pad 2 (warm)", "Pad 3 (polysynth)", "Pad 4 (choir)",
    "Pad 5 (bowed)", "Pad 6 (metallic)", "Pad 7 (halo)", "Pad 8 (sweep)",
    // Synth effects
    "FX 1 (rain)", "FX 2 (soundtrack)", "FX 3 (crystal)", "FX 4 (atmosphere)",
    "FX 5 (brightness)", "FX 6 (goblins)", "FX 7 (echoes)", "FX 8 (sci-fi)",
    // Ethnic
    "Sitar", "Banjo", "Shamisen", "Koto",
    "Kalimba", "Bagpipe", "Fiddle", "Shanai",
    // Percussive
    "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
    "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
    // Sound effects
    "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
    "Telephone Ring", "Helicopter", "Applause", "Gunshot",
];

static EXACT_INDEX: Lazy<HashMap<String, u8>> = Lazy::new(|| {
    GM_INSTRUMENTS
        .iter()
        .enumerate()
        .map(|(program, name)| (normalize(name), program as u8))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instrument {
    pub program: u8,
    pub name: &'static str,
}

impl Instrument {
    pub fn from_program(program: u8) -> Option<Instrument> {
        GM_INSTRUMENTS.get(program as usize).map(|&name| Instrument { program, name })
    }

    /// Exact (normalized) name match only
    pub fn exact(description: &str) -> Option<Instrument> {
        EXACT_INDEX
            .get(&normalize(description))
            .and_then(|&program| Instrument::from_program(program))
    }

    /// Exact match, falling back to the closest name (with a warning)
    pub fn lookup(description: &str) -> Result<Instrument> {
        if let Some(instrument) = Instrument::exact(description) {
            return Ok(instrument);
        }

        let query = normalize(description);
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.is_empty() {
            return Err(EasyMidiError::Configuration(
                "instrument name is empty".to_string(),
            ));
        }

        let mut best: Option<(f64, u8)> = None;
        for (program, name) in GM_INSTRUMENTS.iter().enumerate() {
            let score = name_score(&words, &normalize(name));
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, program as u8));
            }
        }

        match best {
            Some((score, program)) if score >= MIN_SIMILARITY => {
                let instrument = Instrument::from_program(program).ok_or_else(|| {
                    EasyMidiError::Configuration(format!("no instrument for program {}", program))
                })?;
                log::warn!(
                    "instrument \"{}\" isn't a General MIDI name, using \"{}\" instead",
                    description.trim(),
                    instrument.name
                );
                Ok(instrument)
            }
            _ => Err(EasyMidiError::Configuration(format!(
                "unknown instrument \"{}\"",
                description.trim()
            ))),
        }
    }
}

/// Lowercase, punctuation to spaces, single-spaced
fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Average over query words of the best similarity with any word of `name`
fn name_score(query_words: &[&str], name: &str) -> f64 {
    let name_words: Vec<&str> = name.split_whitespace().collect();
    let total: f64 = query_words
        .iter()
        .map(|q| {
            name_words
                .iter()
                .map(|w| similarity(q, w))
                .fold(0.0, f64::max)
        })
        .sum();
    total / query_words.len() as f64
}

/// Ratcliff/Obershelp similarity: 2 * matching chars / total chars
fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (mut len, mut at_a, mut at_b) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > len {
                len = k;
                at_a = i;
                at_b = j;
            }
        }
    }
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..at_a], &b[..at_b])
        + matching_chars(&a[at_a + len..], &b[at_b + len..])
}
