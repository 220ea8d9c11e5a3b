//! Voice partitioning and merging
//!
//! A voice is one monophonic line: a run of notes in which no two overlap
//! in time. `partition` splits a polyphonic note stream into voices by
//! greedy first-fit; `merge` folds together voices whose note sets turn
//! out to be disjoint over the whole piece.

use crate::note::Note;

/// One monophonic line of mutually non-overlapping notes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Voice {
    notes: Vec<Note>,
}

impl Voice {
    fn with_note(note: Note) -> Self {
        Voice { notes: vec![note] }
    }

    /// True when `note` collides with none of the notes already held.
    ///
    /// Every held note is checked, not just the most recent: with input
    /// sorted by onset the scan short-circuits on the first collision.
    pub fn accepts(&self, note: &Note) -> bool {
        self.notes.iter().all(|held| !held.overlaps(note))
    }

    /// True when no note of `self` overlaps any note of `other`
    pub fn disjoint_from(&self, other: &Voice) -> bool {
        self.notes
            .iter()
            .all(|a| other.notes.iter().all(|b| !a.overlaps(b)))
    }

    /// Notes in this voice, ordered by onset once the pipeline is done
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    fn absorb(&mut self, other: Voice) {
        self.notes.extend(other.notes);
    }

    fn sort_by_start(&mut self) {
        self.notes.sort_by(|a, b| a.start.total_cmp(&b.start));
    }
}

/// Split a note stream into monophonic voices by greedy first-fit.
///
/// Each note lands in the first existing voice that accepts it, or opens a
/// new voice when every existing one rejects it. With input sorted
/// ascending by onset this uses the minimum possible number of voices
/// (first-fit coloring of an interval graph).
pub fn partition(notes: Vec<Note>) -> Vec<Voice> {
    let mut voices: Vec<Voice> = Vec::new();

    for note in notes {
        match voices.iter_mut().find(|voice| voice.accepts(&note)) {
            Some(voice) => voice.push(note),
            None => voices.push(Voice::with_note(note)),
        }
    }

    voices
}

/// Fold together voices that never collide anywhere in the piece.
///
/// Pairs are scanned in fixed index order. When voice `j` folds into voice
/// `i` the right index stays put (it now names the next candidate), so the
/// result is deterministic for a given input order. Surviving voices are
/// re-sorted by onset afterwards, since absorbing appends out of order.
pub fn merge(mut voices: Vec<Voice>) -> Vec<Voice> {
    let mut i = 0;
    while i + 1 < voices.len() {
        let mut j = i + 1;
        while j < voices.len() {
            if voices[i].disjoint_from(&voices[j]) {
                let absorbed = voices.remove(j);
                voices[i].absorb(absorbed);
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    for voice in &mut voices {
        voice.sort_by_start();
    }

    voices
}
