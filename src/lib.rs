pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod core;
pub mod scene;
pub mod synth;
pub mod ui;
