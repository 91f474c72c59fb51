//! Default values for MIDI export
//!
//! Provides sensible defaults for tempo, volume, channel assignment, etc.

/// Default tempo in beats per minute
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Default note volume / velocity (0-127, 64 is "normal")
pub const DEFAULT_VOLUME: u8 = 64;

/// Default MIDI program (0 = Acoustic Grand Piano in General MIDI)
pub const DEFAULT_PROGRAM: u8 = 0;

/// Default ticks per quarter note (MIDI resolution)
/// 480 is standard and provides good resolution
pub const DEFAULT_TPQ: u16 = 480;

/// Largest resolution an SMF header can hold (15 bits)
pub const MAX_TPQ: u16 = 0x7FFF;

/// Largest tempo value a Set Tempo meta event can hold (24 bits)
pub const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// General MIDI percussion channel (10 in 1-indexed terms)
pub const DRUM_CHANNEL: u8 = 9;

/// Number of melodic channels once the drum channel is skipped
pub const MELODIC_CHANNELS: usize = 15;

/// Assign MIDI channel from track index
/// - Channels 0-15 are available
/// - Channel 9 (10 in 1-indexed) is reserved for drums
/// - Skip channel 9 for melodic instruments
pub fn assign_channel(track_index: usize) -> u8 {
    let channel = track_index % MELODIC_CHANNELS;
    if channel >= DRUM_CHANNEL as usize {
        // Skip channel 9 (drums), map 9→10, 10→11, etc.
        (channel + 1) as u8
    } else {
        channel as u8
    }
}

/// Microseconds per quarter note for a tempo, if a Set Tempo event can hold it
///
/// The representable range is roughly 3.58 to 60,000,000 BPM.
pub fn tempo_micros(bpm: f64) -> Option<u32> {
    if !(bpm.is_finite() && bpm > 0.0) {
        return None;
    }
    let micros = (60_000_000.0 / bpm).round();
    if (1.0..=MAX_TEMPO_MICROS as f64).contains(&micros) {
        Some(micros as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_channel() {
        assert_eq!(assign_channel(0), 0);
        assert_eq!(assign_channel(1), 1);
        assert_eq!(assign_channel(8), 8);
        assert_eq!(assign_channel(9), 10);  // Skip channel 9
        assert_eq!(assign_channel(10), 11);
        assert_eq!(assign_channel(14), 15);
        assert_eq!(assign_channel(15), 0);  // Wrap around
    }

    #[test]
    fn test_assign_channel_never_uses_drums() {
        assert!((0..64).all(|i| assign_channel(i) != DRUM_CHANNEL));
    }

    #[test]
    fn test_tempo_micros() {
        assert_eq!(tempo_micros(120.0), Some(500_000));
        assert_eq!(tempo_micros(90.0), Some(666_667));
        assert_eq!(tempo_micros(4.0), Some(15_000_000));
        // 2 BPM needs 30,000,000 us, more than 24 bits
        assert_eq!(tempo_micros(2.0), None);
        assert_eq!(tempo_micros(1e9), None);
        assert_eq!(tempo_micros(0.0), None);
        assert_eq!(tempo_micros(f64::NAN), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_TEMPO_BPM, 120.0);
        assert_eq!(DEFAULT_VOLUME, 64);
        assert_eq!(DEFAULT_PROGRAM, 0);
        assert_eq!(DEFAULT_TPQ, 480);
    }
}
