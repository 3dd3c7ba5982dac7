use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::f32::consts::TAU;
use tracing::debug;

pub type VoiceId = u64;

/// Commands from the scene thread to the audio worker. Frequency is fixed
/// at spawn; amplitude is the only parameter mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceCommand {
    Spawn { id: VoiceId, freq_hz: f32 },
    SetAmp { id: VoiceId, target: f32, ramp_sec: f32 },
    /// Drop every voice. Sent at the start of a population build.
    Clear,
}

/// A curve's handle on its voice. Commands are fire-and-forget; the bank
/// drops any that arrive for an id it no longer holds, so handles that
/// outlive a reset are harmless.
#[derive(Clone, Debug)]
pub struct VoiceHandle {
    id: VoiceId,
    tx: Sender<VoiceCommand>,
}

impl VoiceHandle {
    pub fn new(id: VoiceId, tx: Sender<VoiceCommand>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn set_amp(&self, target: f32, ramp_sec: f32) {
        let _ = self.tx.send(VoiceCommand::SetAmp {
            id: self.id,
            target,
            ramp_sec,
        });
    }
}

/// One sine oscillator with a linearly ramped amplitude.
#[derive(Clone, Debug)]
pub struct SineVoice {
    freq_hz: f32,
    phase: f32,
    amp: f32,
    amp_target: f32,
    amp_step: f32,
}

impl SineVoice {
    pub fn new(freq_hz: f32) -> Self {
        Self {
            freq_hz,
            phase: 0.0,
            amp: 0.0,
            amp_target: 0.0,
            amp_step: 0.0,
        }
    }

    pub fn freq_hz(&self) -> f32 {
        self.freq_hz
    }

    pub fn amp(&self) -> f32 {
        self.amp
    }

    /// Start a linear ramp to `target` over `ramp_sec` seconds. A
    /// non-positive ramp time jumps immediately.
    pub fn set_amp(&mut self, target: f32, ramp_sec: f32, fs: f32) {
        let target = target.clamp(0.0, 1.0);
        self.amp_target = target;
        if ramp_sec <= 0.0 || fs <= 0.0 {
            self.amp = target;
            self.amp_step = 0.0;
        } else {
            self.amp_step = (target - self.amp) / (ramp_sec * fs);
        }
    }

    fn step_amp(&mut self) {
        if self.amp_step == 0.0 {
            return;
        }
        self.amp += self.amp_step;
        let overshoot = (self.amp_step > 0.0 && self.amp >= self.amp_target)
            || (self.amp_step < 0.0 && self.amp <= self.amp_target);
        if overshoot {
            self.amp = self.amp_target;
            self.amp_step = 0.0;
        }
    }

    /// Add this voice's next samples into `buf`.
    pub fn render_add(&mut self, buf: &mut [f32], fs: f32) {
        let dphase = TAU * self.freq_hz / fs;
        for s in buf.iter_mut() {
            self.step_amp();
            *s += self.phase.sin() * self.amp;
            self.phase = (self.phase + dphase) % TAU;
        }
    }
}

/// All live voices, owned by the audio worker.
#[derive(Debug, Default)]
pub struct VoiceBank {
    voices: HashMap<VoiceId, SineVoice>,
}

impl VoiceBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voice(&self, id: VoiceId) -> Option<&SineVoice> {
        self.voices.get(&id)
    }

    pub fn apply(&mut self, cmd: VoiceCommand, fs: f32) {
        match cmd {
            VoiceCommand::Spawn { id, freq_hz } => {
                self.voices.insert(id, SineVoice::new(freq_hz));
            }
            VoiceCommand::SetAmp {
                id,
                target,
                ramp_sec,
            } => {
                if let Some(v) = self.voices.get_mut(&id) {
                    v.set_amp(target, ramp_sec, fs);
                } else {
                    // In flight across a reset; the voice is gone.
                    debug!("dropping SetAmp for stale voice {id}");
                }
            }
            VoiceCommand::Clear => {
                self.voices.clear();
            }
        }
    }

    /// Mix every voice into `buf` (buf is zeroed first).
    pub fn render_hop(&mut self, buf: &mut [f32], fs: f32) {
        buf.fill(0.0);
        for v in self.voices.values_mut() {
            v.render_add(buf, fs);
        }
    }
}
