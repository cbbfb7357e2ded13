//! Use cases (application services)

pub mod evaluate_speakers;
pub mod process_turn;
