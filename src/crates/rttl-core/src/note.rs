//! Timed note events and pitch naming

use serde::{Deserialize, Serialize};

/// Note names using sharps (matching MIDI convention)
const NOTE_NAMES: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// A single note event with absolute timing in seconds.
///
/// This is the unit every stage of the conversion works on: the reader
/// produces them, the partitioner groups them into voices, and the encoder
/// turns them into RTTL tokens. Valid notes satisfy `0 <= start < end`
/// with both timestamps inside the supported score horizon; the pipeline
/// rejects anything else up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch number (0-127)
    pub pitch: u8,
    /// MIDI velocity the note was struck with
    pub velocity: u8,
    /// Onset in seconds from the start of the score
    pub start: f64,
    /// Release in seconds from the start of the score
    pub end: f64,
}

impl Note {
    pub fn new(pitch: u8, velocity: u8, start: f64, end: f64) -> Self {
        Note {
            pitch,
            velocity,
            start,
            end,
        }
    }

    /// Sounding length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open interval overlap: two notes that merely touch (one ends
    /// exactly where the other starts) do not overlap.
    pub fn overlaps(&self, other: &Note) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Convert a MIDI pitch number to a note name string (e.g., 60 -> "c4")
pub fn note_name(pitch: u8) -> String {
    let name = NOTE_NAMES[(pitch % 12) as usize];
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", name, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name_conversion() {
        assert_eq!(note_name(60), "c4"); // Middle C
        assert_eq!(note_name(69), "a4"); // A440
        assert_eq!(note_name(61), "c#4");
        assert_eq!(note_name(0), "c-1");
        assert_eq!(note_name(127), "g9");
    }

    #[test]
    fn test_duration() {
        let note = Note::new(60, 90, 1.0, 2.5);
        assert!((note.duration() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_notes() {
        let a = Note::new(60, 90, 0.0, 1.0);
        let b = Note::new(64, 90, 0.5, 1.5);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_notes_do_not_overlap() {
        let a = Note::new(60, 90, 0.0, 1.0);
        let b = Note::new(64, 90, 1.0, 2.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_contained_note_overlaps() {
        let outer = Note::new(60, 90, 0.0, 4.0);
        let inner = Note::new(64, 90, 1.0, 2.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_disjoint_notes_do_not_overlap() {
        let a = Note::new(60, 90, 0.0, 1.0);
        let b = Note::new(64, 90, 3.0, 4.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }
}
