//! Core engine for turning timed note events into RTTL ringtone strings.
//!
//! The pipeline has three stages: `partition` splits a polyphonic note
//! stream into monophonic voices, `merge` folds voices back together when
//! their notes never collide, and `encode_voice` renders each voice as a
//! tempo-headed RTTL token stream. [`convert`] runs all three.
//!
//! # Example
//!
//! ```
//! use rttl_core::{convert_to_strings, Note};
//!
//! let notes = vec![
//!     Note::new(60, 90, 0.0, 0.5),
//!     Note::new(64, 90, 0.5, 1.0),
//! ];
//! let strings = convert_to_strings(notes, 120.0).unwrap();
//! assert_eq!(strings, vec![":b=120,o=0:4c4,4e4".to_string()]);
//! ```

pub mod encode;
pub mod note;
pub mod rhythm;
pub mod token;
pub mod voice;


pub use encode::{convert, convert_to_strings, encode_voice};
pub use note::{note_name, Note};
pub use rhythm::{note_token, rest_tokens};
pub use token::{Ringtone, Token};
pub use voice::{merge, partition, Voice};

/// Errors reported by the conversion pipeline.
///
/// Partitioning, merging, and encoding are total once inputs pass
/// validation, so every variant is an input rejection. An empty note list
/// is not an error; [`convert`] returns an empty list for it.
#[derive(Debug, thiserror::Error)]
pub enum RttlError {
    /// Tempo must be a positive, finite beats-per-minute value
    #[error("Invalid tempo: {bpm} bpm (must be positive and finite)")]
    InvalidTempo { bpm: f64 },

    /// A note violated `0 <= start < end` or lies past the score horizon
    #[error("Degenerate note: pitch {pitch} spans {start}s..{end}s")]
    DegenerateDuration { pitch: u8, start: f64, end: f64 },
}

pub type Result<T> = std::result::Result<T, RttlError>;
