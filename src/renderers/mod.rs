//! Output renderers

pub mod midi;
