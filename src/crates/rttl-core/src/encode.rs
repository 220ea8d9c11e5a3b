//! Voice encoding and the full conversion pipeline

use crate::note::Note;
use crate::rhythm::{note_token, rest_tokens};
use crate::token::Ringtone;
use crate::voice::{merge, partition, Voice};
use crate::{Result, RttlError};

/// Latest accepted timestamp, in seconds (a bit over eleven days).
///
/// Rest decomposition walks gaps beat by beat, so a far-future onset
/// would emit an absurd token stream and, past the range where f64
/// subtraction still makes progress, none at all. Notes beyond the
/// horizon are rejected up front instead.
const MAX_EVENT_SECONDS: f64 = 1_000_000.0;

/// Encode one voice against the shared tempo.
///
/// Walks the voice's notes in onset order, emitting rest tokens for any
/// forward gap since the previous release (or since time zero for the
/// first note) and then the note's own token. Back-to-back notes produce
/// no rest.
pub fn encode_voice(voice: &Voice, bpm: f64) -> Ringtone {
    let mut ringtone = Ringtone::new(bpm.round() as u32);
    let mut last_end = 0.0;

    for note in voice.notes() {
        let gap = note.start - last_end;
        if gap != 0.0 {
            ringtone.tokens.extend(rest_tokens(gap, bpm));
        }
        ringtone.tokens.push(note_token(note, bpm));
        last_end = note.end;
    }

    ringtone
}

/// Run the full pipeline: validate, sort, partition, merge, encode.
///
/// Notes may arrive in any order; they are stable-sorted by onset before
/// partitioning. An empty note list is not an error and yields no
/// ringtones, though the tempo is still validated first.
pub fn convert(mut notes: Vec<Note>, bpm: f64) -> Result<Vec<Ringtone>> {
    validate_tempo(bpm)?;
    validate_notes(&notes)?;

    notes.sort_by(|a, b| a.start.total_cmp(&b.start));
    let voices = merge(partition(notes));

    Ok(voices.iter().map(|voice| encode_voice(voice, bpm)).collect())
}

/// Like [`convert`], but returns the rendered RTTL strings.
pub fn convert_to_strings(notes: Vec<Note>, bpm: f64) -> Result<Vec<String>> {
    Ok(convert(notes, bpm)?.iter().map(Ringtone::to_rttl).collect())
}

fn validate_tempo(bpm: f64) -> Result<()> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(RttlError::InvalidTempo { bpm });
    }
    Ok(())
}

fn validate_notes(notes: &[Note]) -> Result<()> {
    for note in notes {
        let valid = note.start.is_finite()
            && note.end.is_finite()
            && note.start >= 0.0
            && note.end > note.start
            && note.end <= MAX_EVENT_SECONDS;
        if !valid {
            return Err(RttlError::DegenerateDuration {
                pitch: note.pitch,
                start: note.start,
                end: note.end,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melody_encodes_to_one_string() {
        let notes = vec![
            Note::new(60, 90, 0.0, 0.5),
            Note::new(64, 90, 0.5, 1.0),
        ];
        let strings = convert_to_strings(notes, 120.0).unwrap();
        assert_eq!(strings, vec![":b=120,o=0:4c4,4e4".to_string()]);
    }

    #[test]
    fn test_gap_becomes_rest_tokens() {
        // One-beat gap between release and the next onset.
        let notes = vec![
            Note::new(60, 90, 0.0, 0.5),
            Note::new(64, 90, 1.0, 1.5),
        ];
        let strings = convert_to_strings(notes, 120.0).unwrap();
        assert_eq!(strings, vec![":b=120,o=0:4c4,1p,4e4".to_string()]);
    }

    #[test]
    fn test_leading_silence_becomes_rest() {
        let notes = vec![Note::new(60, 90, 0.5, 1.0)];
        let strings = convert_to_strings(notes, 120.0).unwrap();
        assert_eq!(strings, vec![":b=120,o=0:1p,4c4".to_string()]);
    }

    #[test]
    fn test_overlap_produces_two_ringtones() {
        let notes = vec![
            Note::new(60, 90, 0.0, 1.0),
            Note::new(64, 90, 0.5, 1.5),
        ];
        let strings = convert_to_strings(notes, 120.0).unwrap();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0], ":b=120,o=0:2c4");
        // The second voice starts a beat late: rest, then its note.
        assert_eq!(strings[1], ":b=120,o=0:1p,2e4");
    }

    #[test]
    fn test_encoded_ringtones_are_never_empty() {
        let ringtones = convert(
            vec![Note::new(60, 90, 0.0, 1.0), Note::new(64, 90, 0.5, 1.5)],
            120.0,
        )
        .unwrap();
        assert_eq!(ringtones.len(), 2);
        assert!(ringtones.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let notes = vec![
            Note::new(64, 90, 0.5, 1.0),
            Note::new(60, 90, 0.0, 0.5),
        ];
        let strings = convert_to_strings(notes, 120.0).unwrap();
        assert_eq!(strings, vec![":b=120,o=0:4c4,4e4".to_string()]);
    }

    #[test]
    fn test_fractional_tempo_rounds_in_header() {
        let notes = vec![Note::new(60, 90, 0.0, 0.5)];
        let strings = convert_to_strings(notes, 119.6).unwrap();
        assert!(strings[0].starts_with(":b=120,o=0:"));
    }

    #[test]
    fn test_re_encoding_a_voice_is_byte_identical() {
        let voices = merge(partition(vec![
            Note::new(60, 90, 0.0, 0.5),
            Note::new(64, 90, 1.0, 1.5),
        ]));
        let first = encode_voice(&voices[0], 120.0).to_rttl();
        let second = encode_voice(&voices[0], 120.0).to_rttl();
        assert_eq!(first, second);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let notes = vec![
            Note::new(60, 90, 0.0, 1.0),
            Note::new(64, 90, 0.25, 0.75),
            Note::new(67, 90, 1.0, 2.0),
        ];
        let first = convert_to_strings(notes.clone(), 96.0).unwrap();
        let second = convert_to_strings(notes, 96.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let strings = convert_to_strings(Vec::new(), 120.0).unwrap();
        assert!(strings.is_empty());
    }

    #[test]
    fn test_invalid_tempo_rejected() {
        for bpm in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = convert(vec![Note::new(60, 90, 0.0, 1.0)], bpm);
            assert!(matches!(result, Err(RttlError::InvalidTempo { .. })));
        }
    }

    #[test]
    fn test_tempo_checked_before_empty_input() {
        let result = convert(Vec::new(), 0.0);
        assert!(matches!(result, Err(RttlError::InvalidTempo { .. })));
    }

    #[test]
    fn test_degenerate_notes_rejected() {
        let zero_len = convert(vec![Note::new(60, 90, 1.0, 1.0)], 120.0);
        assert!(matches!(
            zero_len,
            Err(RttlError::DegenerateDuration { pitch: 60, .. })
        ));

        let inverted = convert(vec![Note::new(64, 90, 2.0, 1.0)], 120.0);
        assert!(inverted.is_err());

        let negative_start = convert(vec![Note::new(64, 90, -0.5, 1.0)], 120.0);
        assert!(negative_start.is_err());

        let nan_end = convert(vec![Note::new(64, 90, 0.0, f64::NAN)], 120.0);
        assert!(nan_end.is_err());
    }

    #[test]
    fn test_far_future_notes_rejected() {
        // A valid-looking note 9.1e15 s in would ask the pause encoder
        // for ~1.8e16 beats of leading rest; the horizon check refuses
        // it before encoding starts.
        let result = convert(vec![Note::new(60, 90, 9.1e15, 9.1e15 + 2.0)], 120.0);
        assert!(matches!(
            result,
            Err(RttlError::DegenerateDuration { pitch: 60, .. })
        ));

        // The horizon itself is still accepted.
        let at_horizon = convert(vec![Note::new(60, 90, 0.0, 1_000_000.0)], 120.0);
        assert!(at_horizon.is_ok());
    }

    #[test]
    fn test_error_messages_name_the_input() {
        let err = convert(vec![Note::new(60, 90, 0.0, 1.0)], -3.0).unwrap_err();
        assert!(err.to_string().contains("-3"));

        let err = convert(vec![Note::new(71, 90, 2.0, 2.0)], 120.0).unwrap_err();
        assert!(err.to_string().contains("71"));
    }
}
