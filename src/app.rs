use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::audio::output_guard::OutputGuardMode;
use crate::cli::Args;
use crate::config::{AppConfig, OutputGuardSetting};
use crate::core::geometry::Bounds;
use crate::scene::population::Population;
use crate::synth::engine::{AudioRuntime, EngineConfig};
use crate::synth::voice::VoiceCommand;
use crate::ui::view;

pub struct App {
    population: Population,
    rng: SmallRng,
    cfg: AppConfig,
    audio_enabled: bool,
    audio: Option<AudioRuntime>,
    _voice_tx: Sender<VoiceCommand>,
    // Held until the audio pipeline comes up; commands queue in the
    // channel meanwhile, so the first population's voices are not lost.
    pending_rx: Option<Receiver<VoiceCommand>>,
    initialized: bool,
    exiting: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        args: Args,
        cfg: AppConfig,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Self, crate::scene::population::SceneError> {
        let (voice_tx, voice_rx) = unbounded::<VoiceCommand>();
        let population = Population::new(cfg.scene.population_size, voice_tx.clone())?;

        cc.egui_ctx.set_pixels_per_point(1.0);

        let mut app = Self {
            population,
            rng: SmallRng::seed_from_u64(rand::rng().random()),
            cfg,
            audio_enabled: args.play,
            audio: None,
            _voice_tx: voice_tx,
            pending_rx: Some(voice_rx),
            initialized: false,
            exiting: stop_flag,
        };
        app.try_start_audio();
        Ok(app)
    }

    /// Bring the audio pipeline up if it is not running. Failure is
    /// logged and left for the next user gesture to retry.
    fn try_start_audio(&mut self) {
        if !self.audio_enabled || self.audio.is_some() {
            return;
        }
        let Some(rx) = self.pending_rx.take() else {
            return;
        };
        let engine_cfg = EngineConfig {
            master_gain: self.cfg.audio.master_gain,
            guard: match self.cfg.audio.output_guard {
                OutputGuardSetting::None => OutputGuardMode::None,
                OutputGuardSetting::SoftClip => OutputGuardMode::default(),
            },
            ..EngineConfig::default()
        };
        match AudioRuntime::start(self.cfg.audio.latency_ms, engine_cfg, rx.clone()) {
            Ok(runtime) => {
                info!("audio pipeline started");
                self.audio = Some(runtime);
            }
            Err(err) => {
                warn!("audio unavailable ({err}); will retry on next click");
                self.pending_rx = Some(rx);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exiting.load(Ordering::SeqCst) {
            info!("SIGINT received: closing window");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let rect = ctx.screen_rect();
        let bounds = Bounds::new(rect.width(), rect.height());

        if !self.initialized {
            self.population.initialize(bounds, &mut self.rng);
            self.initialized = true;
        }

        if ctx.input(|i| i.pointer.any_pressed()) {
            self.try_start_audio();
            self.population.on_reset_event(bounds, &mut self.rng);
        }

        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        self.population.frame_tick(bounds, dt);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                view::paint_scene(ui.painter(), &self.population, self.cfg.scene.glyph_size);
            });

        ctx.request_repaint_after(std::time::Duration::from_millis(16));
    }
}
