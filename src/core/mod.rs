pub mod geometry;
pub mod pitch;
