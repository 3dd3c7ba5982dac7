use crate::audio::output::AudioOutput;
use crate::audio::output_guard::{OutputGuard, OutputGuardMode};
use crate::synth::voice::{VoiceBank, VoiceCommand};
use crossbeam_channel::Receiver;
use ringbuf::traits::Producer;
use ringbuf::HeapProd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub fs: f32,
    /// Samples rendered per iteration of the worker loop.
    pub hop: usize,
    /// Applied to the mixed signal before the guard; 15 voices at 0.5
    /// amplitude would clip hard otherwise.
    pub master_gain: f32,
    pub guard: OutputGuardMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fs: 48_000.0,
            hop: 256,
            master_gain: 0.125,
            guard: OutputGuardMode::default(),
        }
    }
}

/// Spawn the audio worker: drain voice commands, render one hop from the
/// bank, guard it and push it into the device ring. Paced to the hop
/// duration.
pub fn spawn_worker(
    cfg: EngineConfig,
    cmd_rx: Receiver<VoiceCommand>,
    mut prod: HeapProd<f32>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("audio-worker".into())
        .spawn(move || {
            let mut bank = VoiceBank::new();
            let mut guard = OutputGuard::new(cfg.guard);
            let mut chunk = vec![0.0f32; cfg.hop];
            let hop_duration = Duration::from_secs_f32(cfg.hop as f32 / cfg.fs);
            let mut next_deadline = Instant::now();

            loop {
                if stop.load(Ordering::SeqCst) {
                    debug!("stopping audio worker");
                    break;
                }
                next_deadline += hop_duration;

                for cmd in cmd_rx.try_iter() {
                    bank.apply(cmd, cfg.fs);
                }

                bank.render_hop(&mut chunk, cfg.fs);
                for s in chunk.iter_mut() {
                    *s *= cfg.master_gain;
                }
                guard.process(&mut chunk);
                push_samples(&mut prod, &chunk, &stop);

                let now = Instant::now();
                if now < next_deadline {
                    thread::sleep(next_deadline - now);
                } else {
                    next_deadline = now;
                    trace!("audio worker overrun");
                }
            }
        })
        .expect("spawn audio worker")
}

/// Blocking push into the SPSC ring; the device callback drains it.
fn push_samples(prod: &mut HeapProd<f32>, samples: &[f32], stop: &AtomicBool) {
    let mut offset = 0;
    while offset < samples.len() {
        let written = prod.push_slice(&samples[offset..]);
        offset += written;
        if offset < samples.len() {
            if stop.load(Ordering::SeqCst) {
                return;
            }
            thread::sleep(Duration::from_micros(200));
        }
    }
}

/// Everything owned by a running audio pipeline: the cpal stream, the
/// worker thread and its stop flag. Dropping it tears the pipeline down.
pub struct AudioRuntime {
    _output: AudioOutput,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AudioRuntime {
    pub fn start(
        latency_ms: f32,
        cfg_template: EngineConfig,
        cmd_rx: Receiver<VoiceCommand>,
    ) -> Result<Self, crate::audio::output::AudioError> {
        let (output, prod) = AudioOutput::new(latency_ms)?;
        let cfg = EngineConfig {
            fs: output.sample_rate() as f32,
            ..cfg_template
        };
        let stop = Arc::new(AtomicBool::new(false));
        let worker = spawn_worker(cfg, cmd_rx, prod, stop.clone());
        Ok(Self {
            _output: output,
            stop,
            worker: Some(worker),
        })
    }
}

impl Drop for AudioRuntime {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
