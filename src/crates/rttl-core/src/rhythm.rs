//! Rhythm quantization: real durations into RTTL duration codes
//!
//! Note tokens quantize against the whole note (code 4 = quarter note)
//! while rest decomposition runs on quarter-note beats. The two time
//! bases differ; emitted tokens match the established player behavior.

use crate::note::Note;
use crate::token::Token;

/// Rest decomposition steps: beat fraction paired with its duration code,
/// largest first. The code is the fraction's denominator.
const REST_STEPS: [(f64, u32); 7] = [
    (1.0, 1),
    (1.0 / 2.0, 2),
    (1.0 / 4.0, 4),
    (1.0 / 6.0, 6),
    (1.0 / 8.0, 8),
    (1.0 / 12.0, 12),
    (1.0 / 16.0, 16),
];

/// Quantize one note's sounding duration into its RTTL token.
///
/// The duration code is `whole_note_secs / duration` (4 = quarter note,
/// 1 = whole note). A ratio whose fractional part lands in the detection
/// band around one half (`round(frac * 10) == 5`, i.e. [0.45, 0.55))
/// becomes a dotted token with the floored code; every other ratio rounds
/// to the nearest plain code. The ratio is not clamped: a near-zero
/// duration drives it past `u32::MAX`, where the cast saturates.
pub fn note_token(note: &Note, bpm: f64) -> Token {
    let whole_note_secs = 60.0 / bpm * 4.0;
    let ratio = whole_note_secs / note.duration();

    if (ratio.fract() * 10.0).round() == 5.0 {
        Token::Note {
            duration: ratio.floor() as u32,
            dotted: true,
            pitch: note.pitch,
        }
    } else {
        Token::Note {
            duration: ratio.round() as u32,
            dotted: false,
            pitch: note.pitch,
        }
    }
}

/// Decompose a gap between notes into rest tokens by greedy subtraction.
///
/// The gap is measured in quarter-note beats and consumed largest step
/// first, restarting from the top of the table after every chunk. A
/// positive residue smaller than the finest step emits a whole-beat `1p`
/// and overshoots. Decomposition stops as soon as an iteration fails to
/// shrink the remainder (floating-point absorption at extreme
/// magnitudes), so the loop always terminates.
pub fn rest_tokens(rest_secs: f64, bpm: f64) -> Vec<Token> {
    let beat_secs = 60.0 / bpm;
    let mut remaining = rest_secs / beat_secs;
    let mut tokens = Vec::new();

    while remaining > 0.0 {
        let before = remaining;
        match REST_STEPS.iter().find(|(frac, _)| *frac <= remaining) {
            Some(&(frac, code)) => {
                remaining -= frac;
                tokens.push(Token::Rest { duration: code });
            }
            None => {
                tokens.push(Token::Rest { duration: 1 });
                remaining -= 1.0;
            }
        }
        // Past ~2^53 beats the subtraction is absorbed by rounding and
        // the remainder never changes; stop instead of spinning.
        if remaining >= before {
            break;
        }
    }

    tokens
}
