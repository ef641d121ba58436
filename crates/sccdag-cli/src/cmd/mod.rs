pub mod analyze;
pub mod sample;
