//! Sine voices and the audio worker that renders them.

pub mod engine;
pub mod voice;
