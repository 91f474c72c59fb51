//! Music data model
//!
//! Notes, chords, roman-numeral chords and tracks, plus the pitch-class and
//! instrument vocabularies they are built from.

pub mod chord;
pub mod event;
pub mod instrument;
pub mod note;
pub mod pitch_class;
pub mod roman;
pub mod track;

use num_rational::{Rational32, Rational64};

/// Exact musical time in whole-note units (1/4 = quarter note)
pub type Rational = Rational32;

/// Sum of two times, or `None` if the reduced result no longer fits in i32
pub fn checked_add(a: Rational, b: Rational) -> Option<Rational> {
    let wide = |r: Rational| Rational64::new_raw(*r.numer() as i64, *r.denom() as i64);
    let (a, b) = (wide(a), wide(b));
    // Both denominators fit in i32, so the cross products cannot overflow i64
    let sum = Rational64::new(
        a.numer() * b.denom() + b.numer() * a.denom(),
        a.denom() * b.denom(),
    );
    Some(Rational::new_raw(
        i32::try_from(*sum.numer()).ok()?,
        i32::try_from(*sum.denom()).ok()?,
    ))
}

// Re-export commonly used types
pub use chord::Chord;
pub use event::Event;
pub use instrument::Instrument;
pub use note::{Note, NoteName};
pub use pitch_class::PitchClass;
pub use roman::RomanChord;
pub use track::{Timeline, Track};
