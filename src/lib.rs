//! MIDI to RTTL converter
//!
//! Reads a Standard MIDI File, splits its notes into monophonic voices,
//! and renders one RTTL ringtone string per voice, optionally wrapped in
//! an Arduino sketch for the MusicWithoutDelay library. The partitioning
//! and encoding engine lives in the `rttl-core` crate; this crate adds
//! MIDI input and output shaping around it.

pub mod midi;
pub mod sketch;

pub use midi::Score;
pub use sketch::generate_sketch;

// Re-export the engine surface so callers need only one crate.
pub use rttl_core::{convert, convert_to_strings, Note, Ringtone, RttlError, Token};
