// Entry point: launches the egui/eframe artwork window.
use clap::Parser;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use glyphtrail::app::App;
use glyphtrail::cli::Args;
use glyphtrail::config::AppConfig;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let cfg = AppConfig::load_or_default(&args.config);

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Glyphtrail",
        native_options,
        Box::new(|cc| {
            let app = App::new(cc, args, cfg, stop_flag.clone())?;
            Ok(Box::new(app))
        }),
    )
}
