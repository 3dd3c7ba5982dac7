use crate::core::geometry::Bounds;
use crate::core::pitch::note_to_freq;
use crate::scene::curve::Curve;
use crate::scene::palette::{ColorLedger, COLOR_CAP, NOTE_NAMES, PALETTE};
use crate::synth::voice::{VoiceCommand, VoiceHandle, VoiceId};
use crossbeam_channel::Sender;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use tracing::{debug, info};

/// Fatal misconfiguration of the population build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// More curves requested than the palette can ever color.
    PopulationExceedsPalette { requested: usize, capacity: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::PopulationExceedsPalette {
                requested,
                capacity,
            } => write!(
                f,
                "population size {requested} exceeds palette capacity {capacity}"
            ),
        }
    }
}

impl std::error::Error for SceneError {}

/// Owns the curve set, the color ledger and the note rotation. All
/// mutation happens on the scene thread; the audio side only ever sees
/// voice commands.
#[derive(Debug)]
pub struct Population {
    size: usize,
    curves: Vec<Curve>,
    ledger: ColorLedger,
    notes: Vec<&'static str>,
    clock_sec: f64,
    voice_tx: Sender<VoiceCommand>,
    next_voice_id: VoiceId,
}

impl Population {
    /// Fails fast when `size` can never be colored under the cap;
    /// otherwise the build loop below would never terminate.
    pub fn new(size: usize, voice_tx: Sender<VoiceCommand>) -> Result<Self, SceneError> {
        let capacity = PALETTE.len() * COLOR_CAP as usize;
        if size > capacity {
            return Err(SceneError::PopulationExceedsPalette {
                requested: size,
                capacity,
            });
        }
        Ok(Self {
            size,
            curves: Vec::new(),
            ledger: ColorLedger::new(),
            notes: NOTE_NAMES.to_vec(),
            clock_sec: 0.0,
            voice_tx,
            next_voice_id: 0,
        })
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn ledger(&self) -> &ColorLedger {
        &self.ledger
    }

    pub fn clock_sec(&self) -> f64 {
        self.clock_sec
    }

    /// Rebuild the whole population in one step: drop every voice, reset
    /// the ledger, re-shuffle the note rotation, then accept candidates
    /// until the target count is live. The note index advances only on
    /// acceptance, so notes are dealt round-robin over accepted curves.
    pub fn initialize<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.curves.clear();
        self.ledger.reset();
        let _ = self.voice_tx.send(VoiceCommand::Clear);
        self.notes.shuffle(rng);

        let mut note_ix = 0usize;
        while self.curves.len() < self.size {
            let note = self.notes[note_ix % self.notes.len()];
            // The note set is fixed and known-valid; a failure here is a
            // programming error in the palette tables.
            let freq_hz = note_to_freq(note).unwrap_or(440.0);
            let id = self.next_voice_id;
            let handle = VoiceHandle::new(id, self.voice_tx.clone());
            match Curve::spawn(rng, bounds, note, handle, &mut self.ledger) {
                Some(curve) => {
                    // Voice is created only for accepted candidates.
                    let _ = self.voice_tx.send(VoiceCommand::Spawn { id, freq_hz });
                    self.next_voice_id += 1;
                    note_ix += 1;
                    self.curves.push(curve);
                }
                None => {
                    debug!("candidate rejected: palette saturated, retrying");
                }
            }
        }
        info!(
            count = self.curves.len(),
            "population initialized, notes dealt as {:?}", self.notes
        );
    }

    /// External reset trigger (pointer press): discard everything and
    /// rebuild from scratch. Pending envelope deadlines die with their
    /// curves, so nothing stale can ramp a new population's voices.
    pub fn on_reset_event<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.initialize(bounds, rng);
    }

    /// Advance every curve by one frame, in stable vector order so the
    /// render layering is deterministic within a frame.
    pub fn frame_tick(&mut self, bounds: Bounds, dt_sec: f32) {
        self.clock_sec += dt_sec as f64;
        let now = self.clock_sec;
        for curve in &mut self.curves {
            curve.advance(bounds, now);
        }
    }
}
