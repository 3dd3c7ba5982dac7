/// Last safety stage before the device ring: either pass-through or a
/// tanh soft clip that keeps the mix inside the ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputGuardMode {
    None,
    SoftClip { ceiling: f32, drive: f32 },
}

impl Default for OutputGuardMode {
    fn default() -> Self {
        Self::SoftClip {
            ceiling: 0.98,
            drive: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct OutputGuard {
    mode: OutputGuardMode,
}

impl OutputGuard {
    pub fn new(mode: OutputGuardMode) -> Self {
        Self { mode }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        match self.mode {
            OutputGuardMode::None => {}
            OutputGuardMode::SoftClip { ceiling, drive } => {
                let ceiling = ceiling.abs().max(1e-6);
                let drive = drive.max(0.0);
                for s in samples.iter_mut() {
                    let x = if s.is_finite() { *s } else { 0.0 };
                    *s = (x * drive).tanh() * ceiling;
                }
            }
        }
    }
}
