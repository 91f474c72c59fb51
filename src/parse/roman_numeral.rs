//! Roman-numeral chord symbol tokenizer
//!
//! A symbol is `<numeral><modifier><stars>`:
//! - numeral: `I`..`VII` (uppercase) or `i`..`vii` (lowercase)
//! - modifier: `-`/`o`/`°`/`dim`, `+`/`aug`, `sus2`, `sus4`, `maj7`, `dom7`,
//!   `min7`/`m7`, or an added diatonic interval `1`..`14` (so `V7` is a
//!   diatonic seventh chord)
//! - stars: one `*` per inversion
//!
//! Examples: `I`, `ii`, `V7`, `I*`, `Isus2**`, `vii-`, `IV8`.

use crate::error::{EasyMidiError, Result};

/// Largest added interval accepted after the numeral (two octaves)
pub const MAX_ADDED_INTERVAL: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumeralCase {
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    MajorSeventh,
    DominantSeventh,
    MinorSeventh,
    /// Add the diatonic note `n` scale steps above the root (1-based)
    Added(u8),
}

/// A fully tokenized roman-numeral chord symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomanSymbol {
    /// Scale degree 1-7
    pub degree: u8,
    pub case: NumeralCase,
    pub modifier: Option<Modifier>,
    /// Number of inversions (trailing `*` count)
    pub inversion: u8,
}

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

pub fn tokenize(input: &str) -> Result<RomanSymbol> {
    let symbol = input.trim();

    let numeral_len = symbol
        .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
        .unwrap_or(symbol.len());
    let (numeral, rest) = symbol.split_at(numeral_len);

    let case = if !numeral.is_empty() && numeral.chars().all(|c| c.is_ascii_uppercase()) {
        NumeralCase::Upper
    } else if !numeral.is_empty() && numeral.chars().all(|c| c.is_ascii_lowercase()) {
        NumeralCase::Lower
    } else {
        return Err(EasyMidiError::Parse(format!(
            "invalid roman numeral in '{}'. Use I, II, III, IV, V, VI or VII (or lowercase)",
            input
        )));
    };

    let degree = NUMERALS
        .iter()
        .position(|n| n.eq_ignore_ascii_case(numeral))
        .map(|i| i as u8 + 1)
        .ok_or_else(|| {
            EasyMidiError::Parse(format!(
                "invalid roman numeral '{}' in '{}'. Use I, II, III, IV, V, VI or VII",
                numeral, input
            ))
        })?;

    let body = rest.trim_end_matches('*');
    let inversion = rest.len() - body.len();
    if body.contains('*') {
        return Err(EasyMidiError::Parse(format!(
            "inversion stars must come last in '{}'",
            input
        )));
    }

    let modifier = parse_modifier(body, input)?;

    let symbol = RomanSymbol {
        degree,
        case,
        modifier,
        inversion: u8::try_from(inversion)
            .map_err(|_| EasyMidiError::Parse(format!("too many inversions in '{}'", input)))?,
    };
    log::debug!("tokenized roman numeral '{}' as {:?}", input, symbol);
    Ok(symbol)
}

fn parse_modifier(body: &str, input: &str) -> Result<Option<Modifier>> {
    let modifier = match body {
        "" => return Ok(None),
        "-" | "o" | "°" | "dim" => Modifier::Diminished,
        "+" | "aug" => Modifier::Augmented,
        "sus2" => Modifier::Sus2,
        "sus4" => Modifier::Sus4,
        "maj7" => Modifier::MajorSeventh,
        "dom7" => Modifier::DominantSeventh,
        "min7" | "m7" => Modifier::MinorSeventh,
        digits if digits.chars().all(|c| c.is_ascii_digit()) => {
            let interval: u8 = digits.parse().map_err(|_| interval_error(input))?;
            if !(1..=MAX_ADDED_INTERVAL).contains(&interval) {
                return Err(interval_error(input));
            }
            Modifier::Added(interval)
        }
        other => {
            return Err(EasyMidiError::Parse(format!(
                "unknown chord modifier '{}' in '{}'",
                other, input
            )))
        }
    };
    Ok(Some(modifier))
}

fn interval_error(input: &str) -> EasyMidiError {
    EasyMidiError::Parse(format!(
        "added interval in '{}' must be between 1 and {}",
        input, MAX_ADDED_INTERVAL
    ))
}
