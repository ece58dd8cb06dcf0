//! Harness systems
//!
//! The step driver extracted from main.rs for testability.

mod simulation;

pub use simulation::{InputSnapshot, SimulationSystem, StepOutcome};
