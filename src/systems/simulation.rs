//! Simulation step driver
//!
//! Drives the physics world at its fixed rate with pause and single-step
//! control. Input arrives as an immutable per-tick snapshot; there is no
//! process-wide input state.

use satbox_physics::PhysicsWorld;

/// The input signals sampled for one tick
///
/// A fresh snapshot is passed into every update; the driver never reads
/// input from anywhere else.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSnapshot {
    /// Flip between running and paused
    pub toggle_pause: bool,
    /// While paused, advance exactly one step
    pub advance_step: bool,
}

/// What one update did
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// Whether the world was stepped this tick
    pub stepped: bool,
}

/// Drives the fixed-step simulation with pause/single-step control
pub struct SimulationSystem {
    paused: bool,
}

impl SimulationSystem {
    /// Create a driver, optionally starting paused
    pub fn new(start_paused: bool) -> Self {
        Self {
            paused: start_paused,
        }
    }

    /// Whether the simulation is currently paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run one tick: apply the input snapshot, then step unless paused
    ///
    /// While paused, `advance_step` runs exactly one step. Each step
    /// advances simulated time by the world's fixed timestep regardless of
    /// wall-clock time.
    pub fn update(&mut self, world: &mut PhysicsWorld, input: InputSnapshot) -> StepOutcome {
        if input.toggle_pause {
            self.paused = !self.paused;
        }

        let stepped = if !self.paused {
            world.step();
            true
        } else if input.advance_step {
            world.step();
            true
        } else {
            false
        };

        StepOutcome { stepped }
    }
}
