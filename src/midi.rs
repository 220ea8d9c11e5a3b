//! Standard MIDI File reading
//!
//! Flattens an SMF into the engine's note model: paired note on/off
//! events with onsets and releases in absolute seconds, plus the score
//! tempo taken from the earliest set_tempo event.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use rttl_core::Note;

/// Tempo applied to any ticks before the first set_tempo event. Scores
/// with no tempo event at all are rejected instead of defaulted.
const DEFAULT_US_PER_BEAT: u32 = 500_000;

/// A parsed score: the flat note list and the header tempo in BPM.
#[derive(Debug, Clone)]
pub struct Score {
    pub notes: Vec<Note>,
    pub bpm: f64,
}

impl Score {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read MIDI file: {}", path.display()))?;
        Self::from_bytes(&data).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Parse raw SMF bytes and flatten them into timed notes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data).context("Failed to parse MIDI file")?;

        let tempo_map = TempoMap::from_smf(&smf);
        let bpm = match tempo_map.first_tempo() {
            Some(us_per_beat) => 60_000_000.0 / us_per_beat as f64,
            None => anyhow::bail!("MIDI file has no set_tempo event"),
        };

        let notes = collect_notes(&smf, &tempo_map);
        Ok(Score { notes, bpm })
    }
}

/// Tempo changes from every track in absolute-tick order, together with
/// the header's tick resolution.
struct TempoMap {
    ticks_per_beat: u32,
    /// (absolute tick, microseconds per quarter note)
    changes: Vec<(u64, u32)>,
}

impl TempoMap {
    fn from_smf(smf: &Smf) -> Self {
        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int() as u32,
            Timing::Timecode(fps, subframe) => {
                // Convert timecode to ticks per beat approximation
                (fps.as_f32() * subframe as f32 * 4.0) as u32
            }
        };

        let mut changes = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += event.delta.as_int() as u64;
                if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                    changes.push((tick, tempo.as_int()));
                }
            }
        }
        // Stable by tick, so simultaneous changes keep track order
        changes.sort_by_key(|&(tick, _)| tick);

        TempoMap {
            ticks_per_beat,
            changes,
        }
    }

    /// Microseconds per beat of the earliest tempo event, if any
    fn first_tempo(&self) -> Option<u32> {
        self.changes.first().map(|&(_, tempo)| tempo)
    }

    /// Absolute tick to absolute seconds, walking the tempo segments
    fn seconds_at(&self, tick: u64) -> f64 {
        let mut seconds = 0.0;
        let mut cursor = 0u64;
        let mut us_per_beat = DEFAULT_US_PER_BEAT;

        for &(change_tick, tempo) in &self.changes {
            if change_tick >= tick {
                break;
            }
            seconds += self.span_seconds(change_tick - cursor, us_per_beat);
            cursor = change_tick;
            us_per_beat = tempo;
        }

        seconds + self.span_seconds(tick - cursor, us_per_beat)
    }

    fn span_seconds(&self, ticks: u64, us_per_beat: u32) -> f64 {
        let seconds_per_tick = (us_per_beat as f64 / 1_000_000.0) / self.ticks_per_beat as f64;
        ticks as f64 * seconds_per_tick
    }
}

/// Pair note_on/note_off events into timed notes across all tracks.
///
/// Same-pitch overlaps pair FIFO: a note_off closes the oldest open onset
/// for its channel and key. Notes still open when a track ends are closed
/// at the track's final tick, and zero-length pairs are dropped.
fn collect_notes(smf: &Smf, tempo_map: &TempoMap) -> Vec<Note> {
    let mut notes = Vec::new();

    for track in &smf.tracks {
        let mut open: HashMap<(u8, u8), Vec<(u64, u8)>> = HashMap::new();
        let mut tick = 0u64;

        for event in track {
            tick += event.delta.as_int() as u64;
            if let TrackEventKind::Midi { channel, message } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        open.entry((channel.as_int(), key.as_int()))
                            .or_default()
                            .push((tick, vel.as_int()));
                    }
                    // note_on with velocity 0 is a release
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let onsets = open.entry((channel.as_int(), key.as_int())).or_default();
                        if !onsets.is_empty() {
                            let (start_tick, velocity) = onsets.remove(0);
                            notes.extend(finish_note(
                                tempo_map,
                                key.as_int(),
                                velocity,
                                start_tick,
                                tick,
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }

        // Close anything still sounding when the track ends.
        let mut leftovers: Vec<_> = open.into_iter().collect();
        leftovers.sort_by_key(|&((channel, key), _)| (channel, key));
        for ((_, key), onsets) in leftovers {
            for (start_tick, velocity) in onsets {
                notes.extend(finish_note(tempo_map, key, velocity, start_tick, tick));
            }
        }
    }

    notes
}

fn finish_note(
    tempo_map: &TempoMap,
    pitch: u8,
    velocity: u8,
    start_tick: u64,
    end_tick: u64,
) -> Option<Note> {
    // Zero-length and inverted pairs never reach the engine.
    if end_tick <= start_tick {
        return None;
    }
    let start = tempo_map.seconds_at(start_tick);
    let end = tempo_map.seconds_at(end_tick);
    if end <= start {
        return None;
    }
    Some(Note::new(pitch, velocity, start, end))
}
