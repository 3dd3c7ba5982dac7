pub mod output;
pub mod output_guard;
