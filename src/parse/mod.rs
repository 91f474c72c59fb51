//! Token parsers for note names and roman-numeral chord symbols

pub mod pitch_name;
pub mod roman_numeral;

pub use pitch_name::{Accidental, Letter, PitchToken};
pub use roman_numeral::{Modifier, NumeralCase, RomanSymbol};
