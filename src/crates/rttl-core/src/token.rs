//! Typed RTTL tokens and the per-voice ringtone container
//!
//! The encoder produces `Ringtone` values rather than bare strings so that
//! callers can inspect or serialize the token stream; the flat RTTL text is
//! just their rendering.

use serde::{Deserialize, Serialize};

use crate::note::note_name;

/// One element of an RTTL token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A pitched note: duration code, optional dot, MIDI pitch
    Note { duration: u32, dotted: bool, pitch: u8 },
    /// A rest, carrying only a duration code
    Rest { duration: u32 },
}

impl Token {
    /// Render this token in RTTL notation, e.g. `4c4`, `2.g#3`, `8p`
    pub fn to_rttl(&self) -> String {
        match *self {
            Token::Note {
                duration,
                dotted: true,
                pitch,
            } => format!("{}.{}", duration, note_name(pitch)),
            Token::Note {
                duration,
                dotted: false,
                pitch,
            } => format!("{}{}", duration, note_name(pitch)),
            Token::Rest { duration } => format!("{}p", duration),
        }
    }
}

/// A complete single-voice ringtone: tempo header plus ordered tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ringtone {
    /// Header tempo in beats per minute, already rounded
    pub bpm: u32,
    /// Note and rest tokens in playback order
    pub tokens: Vec<Token>,
}

impl Ringtone {
    pub fn new(bpm: u32) -> Self {
        Ringtone {
            bpm,
            tokens: Vec::new(),
        }
    }

    /// Render the full RTTL string: `:b=<bpm>,o=0:<token>,<token>,...`
    pub fn to_rttl(&self) -> String {
        let body: Vec<String> = self.tokens.iter().map(Token::to_rttl).collect();
        format!(":b={},o=0:{}", self.bpm, body.join(","))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
